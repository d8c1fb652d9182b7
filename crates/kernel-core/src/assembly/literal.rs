use super::{Assembler, Downstream, Request};
use crate::plugin::{Kind, Object};
use crate::{Error, Result};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

fn parse_number<T>(kind: &Kind, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse::<T>().map_err(|e| Error::InvalidLiteral {
        kind: kind.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Parse a single token as a scalar, string or URI literal.
///
/// Returns `Ok(None)` for kinds that are not literals.
pub fn parse_literal(kind: &Kind, value: &str) -> Result<Option<Object>> {
    let invalid = |message: &str| Error::InvalidLiteral {
        kind: kind.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    };
    let object = match kind {
        Kind::String => Object::String(value.to_string()),
        Kind::Uri => Object::Uri(Url::parse(value).map_err(|e| invalid(&e.to_string()))?),
        Kind::Bool => match value.trim() {
            v if v.eq_ignore_ascii_case("true") => Object::Bool(true),
            v if v.eq_ignore_ascii_case("false") => Object::Bool(false),
            _ => return Err(invalid("expected `true` or `false`")),
        },
        Kind::Byte => Object::Byte(parse_number(kind, value)?),
        Kind::Short => Object::Short(parse_number(kind, value)?),
        Kind::Int => Object::Int(parse_number(kind, value)?),
        Kind::Long => Object::Long(parse_number(kind, value)?),
        Kind::Float => Object::Float(parse_number(kind, value)?),
        Kind::Double => Object::Double(parse_number(kind, value)?),
        Kind::Char => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Object::Char(c),
                _ => return Err(invalid("expected exactly one character")),
            }
        }
        Kind::Capability(_) | Kind::Array(_) => return Ok(None),
    };
    Ok(Some(object))
}

/// Strings, URIs and scalars.
///
/// Strings and URIs join all tokens; scalars take exactly one.
pub struct LiteralStage {
    next: Downstream,
}

impl LiteralStage {
    pub fn new(next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            next: Downstream::new(next),
        }
    }
}

impl Assembler for LiteralStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let tokens = match request.tokens() {
            Some(tokens) if !tokens.is_empty() => tokens,
            _ => return self.next.assemble(kind, request),
        };
        match kind {
            Kind::Capability(_) | Kind::Array(_) => self.next.assemble(kind, request),
            Kind::String | Kind::Uri => parse_literal(kind, &tokens.concat()),
            _ => match tokens {
                [single] => parse_literal(kind, single),
                _ => Err(Error::TooManyValues {
                    kind: kind.to_string(),
                    values: tokens.to_vec(),
                }),
            },
        }
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::strings;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Kind::Bool, "TRUE", Object::Bool(true))]
    #[case(Kind::Bool, "false", Object::Bool(false))]
    #[case(Kind::Byte, "-8", Object::Byte(-8))]
    #[case(Kind::Short, "300", Object::Short(300))]
    #[case(Kind::Int, " 42 ", Object::Int(42))]
    #[case(Kind::Long, "5000000000", Object::Long(5_000_000_000))]
    #[case(Kind::Float, "1.5", Object::Float(1.5))]
    #[case(Kind::Double, "2.25", Object::Double(2.25))]
    #[case(Kind::Char, "x", Object::Char('x'))]
    #[case(Kind::String, "plain", Object::String("plain".into()))]
    fn test_parse_literal(#[case] kind: Kind, #[case] value: &str, #[case] expected: Object) {
        assert_eq!(parse_literal(&kind, value).unwrap(), Some(expected));
    }

    #[rstest]
    #[case(Kind::Bool, "yes")]
    #[case(Kind::Byte, "300")]
    #[case(Kind::Int, "4x")]
    #[case(Kind::Char, "xy")]
    #[case(Kind::Char, "")]
    #[case(Kind::Uri, "not a uri")]
    fn test_malformed_literal(#[case] kind: Kind, #[case] value: &str) {
        assert!(matches!(
            parse_literal(&kind, value),
            Err(Error::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_strings_join_tokens() {
        let stage = LiteralStage::new(None);
        let tokens = strings(&["a", "b"]);
        assert_eq!(
            stage.assemble(&Kind::String, Request::Tokens(&tokens)).unwrap(),
            Some(Object::String("ab".into()))
        );
    }

    #[test]
    fn test_uri_literal() {
        let stage = LiteralStage::new(None);
        let tokens = strings(&["https://example.com/a"]);
        let out = stage.assemble(&Kind::Uri, Request::Tokens(&tokens)).unwrap().unwrap();
        assert_eq!(out.as_uri().map(|u| u.host_str()), Some(Some("example.com")));
    }

    #[test]
    fn test_scalars_take_one_value() {
        let stage = LiteralStage::new(None);
        let tokens = strings(&["1", "2"]);
        assert!(matches!(
            stage.assemble(&Kind::Int, Request::Tokens(&tokens)),
            Err(Error::TooManyValues { .. })
        ));
    }

    #[test]
    fn test_capabilities_pass_through() {
        let stage = LiteralStage::new(None);
        let tokens = strings(&["racing"]);
        let car = Kind::Capability(crate::plugin::Capability::new("Car"));
        assert!(matches!(
            stage.assemble(&car, Request::Tokens(&tokens)),
            Err(Error::Unhandled { .. })
        ));
    }
}
