use alloc::vec::Vec;

use crate::{tag::*, types::*, SET};

/// Payload of a parse tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Members of a constructed element, in wire order.
    Children(Vec<Node>),
    Value(Asn1Value),
    /// An omitted optional field. Only meaningful when encoding.
    Absent,
}

/// One decoded element together with its position in the source.
///
/// `original_type` is the tag number read from the wire, `r#type` the
/// universal type the element was interpreted as after tag redirection.
/// `start` and `end` are the inclusive offsets of the first identifier
/// octet and the last content octet.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub original_type: u32,
    pub r#type: u32,
    pub class: TagClass,
    pub primitive: bool,
    pub tag_kind: TagKind,
    pub start: usize,
    pub end: usize,
    pub data: NodeData,
}

impl Node {
    /// Creates a universal node for `value`, positioned nowhere.
    /// Used when assembling trees for encoding.
    pub fn from_value(value: Asn1Value) -> Self {
        let tag = value.tag();
        Node {
            original_type: tag.number,
            r#type: tag.number,
            class: tag.class,
            primitive: !tag.constructed,
            tag_kind: TagKind::Implicit,
            start: 0,
            end: 0,
            data: NodeData::Value(value),
        }
    }

    /// Creates a context-specific node carrying `value` under tag `number`.
    pub fn tagged(number: u32, tag_kind: TagKind, value: Asn1Value) -> Self {
        let tag = value.tag();
        Node {
            original_type: number,
            r#type: tag.number,
            class: TagClass::ContextSpecific,
            primitive: tag_kind == TagKind::Implicit && !tag.constructed,
            tag_kind,
            start: 0,
            end: 0,
            data: NodeData::Value(value),
        }
    }

    /// Placeholder for an omitted `[number] EXPLICIT` field.
    pub fn absent(number: u32) -> Self {
        Node {
            original_type: number,
            r#type: number,
            class: TagClass::ContextSpecific,
            primitive: false,
            tag_kind: TagKind::Explicit,
            start: 0,
            end: 0,
            data: NodeData::Absent,
        }
    }

    pub fn tag(&self) -> Tag {
        Tag {
            class: self.class,
            constructed: !self.primitive,
            number: self.original_type,
        }
    }

    /// Number of source bytes this element spans.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn children(&self) -> &[Node] {
        match &self.data {
            NodeData::Children(children) => children,
            _ => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// Follows a path of child indices from this node.
    pub fn at(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, index| node.child(*index))
    }

    pub fn value(&self) -> Option<&Asn1Value> {
        match &self.data {
            NodeData::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the tree below this node into a plain value.
    /// Redirected elements lose their original tag, the value
    /// reflects the type they were interpreted as.
    pub fn into_value(self) -> Asn1Value {
        match self.data {
            NodeData::Value(v) => v,
            NodeData::Absent => Asn1Value::explicit_absent(self.original_type),
            NodeData::Children(children) => {
                let items = children.into_iter().map(Node::into_value).collect();
                match (self.class, self.tag_kind, self.r#type) {
                    (TagClass::Universal, _, SET) | (_, TagKind::Implicit, SET) => {
                        Asn1Value::Set(items)
                    }
                    (TagClass::Universal, _, _) | (_, TagKind::Implicit, _) => {
                        Asn1Value::Sequence(items)
                    }
                    (class, TagKind::Explicit, _) => Asn1Value::Tagged(Tagged {
                        class,
                        number: self.original_type,
                        items,
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::{INTEGER, SEQUENCE};

    fn leaf(value: i64, start: usize) -> Node {
        Node {
            start,
            end: start + 2,
            ..Node::from_value(Asn1Value::integer(value))
        }
    }

    fn sequence(children: Vec<Node>) -> Node {
        Node {
            original_type: SEQUENCE,
            r#type: SEQUENCE,
            class: TagClass::Universal,
            primitive: false,
            tag_kind: TagKind::Implicit,
            start: 0,
            end: children.last().map_or(1, |c| c.end),
            data: NodeData::Children(children),
        }
    }

    #[test]
    fn addresses_subnodes() {
        let tree = sequence(vec![leaf(1, 2), sequence(vec![leaf(2, 7), leaf(3, 10)])]);
        assert_eq!(tree.at(&[1, 0]).and_then(Node::value), Some(&Asn1Value::integer(2)));
        assert_eq!(tree.at(&[]).map(|n| n.r#type), Some(SEQUENCE));
        assert!(tree.at(&[0, 0]).is_none());
        assert!(tree.child(2).is_none());
        assert_eq!(tree.child(0).map(Node::len), Some(3));
    }

    #[test]
    fn converts_tree_to_value() {
        let tree = sequence(vec![leaf(1, 2), leaf(2, 5)]);
        assert_eq!(
            tree.into_value(),
            Asn1Value::Sequence(vec![Asn1Value::integer(1), Asn1Value::integer(2)])
        );
    }

    #[test]
    fn converts_unresolved_context_tag_to_tagged() {
        let mut wrapper = sequence(vec![leaf(5, 2)]);
        wrapper.class = TagClass::ContextSpecific;
        wrapper.original_type = 0;
        wrapper.r#type = 0;
        wrapper.tag_kind = TagKind::Explicit;
        assert_eq!(
            wrapper.into_value(),
            Asn1Value::explicit(0, Asn1Value::integer(5))
        );
    }

    #[test]
    fn builds_tagged_nodes() {
        let node = Node::tagged(1, TagKind::Implicit, Asn1Value::integer(5));
        assert_eq!(node.r#type, INTEGER);
        assert_eq!(node.tag().leading_octet(), 0x81);
        let node = Node::tagged(1, TagKind::Explicit, Asn1Value::integer(5));
        assert_eq!(node.tag().leading_octet(), 0xA1);
        assert_eq!(Node::absent(2).tag().leading_octet(), 0xA2);
    }
}
