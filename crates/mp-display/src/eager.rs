//! Eager-loading directive
//!
//! Tables render one image cell per row; without preloading, each cell
//! costs a media query. A visible column hands the host query layer one
//! [`EagerLoad`] directive instead.

/// Directive telling the host query layer to preload the media relation
/// for every row in the result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EagerLoad {
    /// Intermediate relationship to traverse first, when the column
    /// displays a related record's media.
    pub relationship: Option<String>,
    /// Restrict preloading to one collection.
    pub collection: Option<String>,
}

/// Host query seam: a row query a column can annotate before execution.
pub trait RecordQuery {
    /// Preload the media relation described by the directive.
    fn preload_media(&mut self, load: EagerLoad);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RowQuery {
        preloads: Vec<EagerLoad>,
    }

    impl RecordQuery for RowQuery {
        fn preload_media(&mut self, load: EagerLoad) {
            self.preloads.push(load);
        }
    }

    #[test]
    fn test_query_collects_directives() {
        let mut query = RowQuery::default();
        query.preload_media(EagerLoad {
            relationship: None,
            collection: Some("gallery".to_string()),
        });

        assert_eq!(query.preloads.len(), 1);
        assert_eq!(query.preloads[0].collection.as_deref(), Some("gallery"));
    }
}
