/// Resolves context-specific, application or private tags to universal types.
///
/// ASN1 modules can tag a field without saying what it contains on the wire,
/// e.g. `version [0] EXPLICIT INTEGER`. A `TypeMapper` registered for a nesting
/// depth is asked about every non-universal tag found at that depth and returns
/// the universal type to decode it as, or `None` to leave it unresolved.
///
/// Closures of the form `Fn(u32, usize, usize) -> Option<u32>` are mappers.
///
/// #### Example
/// ```rust
/// # use asnber_transcoder::ber::TypeMapper;
/// use asnber_grammar::INTEGER;
/// let version = |tag: u32, _depth: usize, item: usize| (tag == 0 && item == 0).then(|| INTEGER);
/// assert_eq!(version.map_type(0, 2, 0), Some(INTEGER));
/// assert_eq!(version.map_type(0, 2, 3), None);
/// ```
pub trait TypeMapper {
    /// * `original_tag` - the tag number read from the wire
    /// * `depth` - nesting depth of the element, 0 for the outermost element
    /// * `item` - index of the element among the members of its parent
    fn map_type(&self, original_tag: u32, depth: usize, item: usize) -> Option<u32>;
}

impl<F> TypeMapper for F
where
    F: Fn(u32, usize, usize) -> Option<u32>,
{
    fn map_type(&self, original_tag: u32, depth: usize, item: usize) -> Option<u32> {
        self(original_tag, depth, item)
    }
}

/// Maps a fixed list of tag numbers regardless of position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable(pub alloc::vec::Vec<(u32, u32)>);

impl TypeMapper for TagTable {
    fn map_type(&self, original_tag: u32, _depth: usize, _item: usize) -> Option<u32> {
        self.0
            .iter()
            .find_map(|(tag, r#type)| (*tag == original_tag).then_some(*r#type))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use asnber_grammar::{INTEGER, OCTET_STRING};

    use super::*;

    #[test]
    fn maps_from_table() {
        let table = TagTable(vec![(0, INTEGER), (2, OCTET_STRING)]);
        assert_eq!(table.map_type(0, 1, 0), Some(INTEGER));
        assert_eq!(table.map_type(2, 4, 9), Some(OCTET_STRING));
        assert_eq!(table.map_type(1, 1, 0), None);
    }
}
