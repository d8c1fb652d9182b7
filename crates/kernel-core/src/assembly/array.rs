use super::{Assembler, Downstream, Request};
use crate::Result;
use crate::plugin::{Kind, Object};
use std::sync::Arc;

/// Builds one element per token; elements that come back empty are dropped.
/// Nested array kinds split again at every level.
pub struct ArrayStage {
    next: Downstream,
}

impl ArrayStage {
    pub fn new(next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            next: Downstream::new(next),
        }
    }
}

impl Assembler for ArrayStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let (Kind::Array(element), Some(tokens)) = (kind, request.tokens()) else {
            return self.next.assemble(kind, request);
        };

        let mut items = Vec::with_capacity(tokens.len());
        for token in tokens {
            let single = std::slice::from_ref(token);
            if let Some(item) = self.assemble(element, Request::Tokens(single))? {
                items.push(item);
            }
        }
        Ok(Some(Object::Array(items)))
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}

#[cfg(test)]
mod tests {
    use super::super::LiteralStage;
    use super::super::testing::strings;
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage() -> ArrayStage {
        ArrayStage::new(Some(Arc::new(LiteralStage::new(None)) as Arc<dyn Assembler>))
    }

    #[test]
    fn test_builds_each_element() {
        let tokens = strings(&["1", "2", "3"]);
        let out = stage()
            .assemble(&Kind::array(Kind::Int), Request::Tokens(&tokens))
            .unwrap();
        assert_eq!(
            out,
            Some(Object::Array(vec![
                Object::Int(1),
                Object::Int(2),
                Object::Int(3)
            ]))
        );
    }

    #[test]
    fn test_empty_tokens_give_empty_array() {
        let out = stage()
            .assemble(&Kind::array(Kind::String), Request::Tokens(&[]))
            .unwrap();
        assert_eq!(out, Some(Object::Array(Vec::new())));
    }

    #[test]
    fn test_nested_arrays_split_per_level() {
        let tokens = strings(&["a", "b"]);
        let out = stage()
            .assemble(&Kind::array(Kind::array(Kind::String)), Request::Tokens(&tokens))
            .unwrap();
        assert_eq!(
            out,
            Some(Object::Array(vec![
                Object::Array(vec!["a".into()]),
                Object::Array(vec!["b".into()]),
            ]))
        );
    }
}
