//! Page-based pagination state for resource listings.
//!
//! A [`Collection`] is built fresh for every index request from the total row
//! count and the requested page. All setters clamp instead of rejecting, so a
//! malformed page number degrades to the first page rather than failing.

use serde::Serialize;

/// Pagination metadata, serialized as the `meta` section of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    #[serde(rename = "page")]
    pub pointer: i64,
    #[serde(rename = "pageCount")]
    pub page_count: i64,
    #[serde(rename = "records")]
    pub count: i64,
    #[serde(rename = "recordsPerPage")]
    pub limit: i64,
}

/// One page of records plus its pagination state.
///
/// Serializes as `{"meta": {...}, "collection": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    meta: PageMeta,
    #[serde(rename = "collection")]
    records: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(limit: i64) -> Self {
        let mut collection = Self {
            meta: PageMeta { pointer: 0, page_count: 0, count: 0, limit: 1 },
            records: Vec::new(),
        };
        collection.set_limit(limit);
        collection
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn pointer(&self) -> i64 {
        self.meta.pointer
    }

    pub fn limit(&self) -> i64 {
        self.meta.limit
    }

    pub fn count(&self) -> i64 {
        self.meta.count
    }

    /// Page size is kept strictly positive.
    pub fn set_limit(&mut self, limit: i64) {
        self.meta.limit = limit.max(1);
        self.meta.page_count = self.page_count();
    }

    pub fn set_pointer(&mut self, pointer: i64) {
        self.meta.pointer = pointer.max(0);
    }

    pub fn set_count(&mut self, count: i64) {
        self.meta.count = count.max(0);
    }

    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
    }

    /// `ceil(count / limit)`
    pub fn page_count(&self) -> i64 {
        let PageMeta { count, limit, .. } = self.meta;
        count / limit + i64::from(count % limit != 0)
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> i64 {
        self.meta.limit.saturating_mul((self.meta.pointer - 1).max(0))
    }

    /// True when the pointer lies past the last page.
    pub fn is_out_of_bounds(&self) -> bool {
        self.meta.pointer > self.page_count()
    }

    /// Set records, pointer and count in one go and recompute the page count.
    pub fn grab(&mut self, records: Vec<T>, pointer: i64, count: i64) {
        self.set_records(records);
        self.set_pointer(pointer);
        self.set_count(count);
        self.meta.page_count = self.page_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(limit: i64, count: i64, pointer: i64) -> Collection<()> {
        let mut c = Collection::new(limit);
        c.grab(Vec::new(), pointer, count);
        c
    }

    #[test]
    fn page_count_is_ceiling_of_count_over_limit() {
        for limit in 1..=30 {
            for count in 0..=100 {
                let expected = (count as f64 / limit as f64).ceil() as i64;
                assert_eq!(collection(limit, count, 1).page_count(), expected, "count={count} limit={limit}");
            }
        }
    }

    #[test]
    fn offset_never_goes_negative() {
        for pointer in -5..=10 {
            let c = collection(25, 1000, pointer);
            assert_eq!(c.offset(), 25 * (pointer - 1).max(0));
            assert!(c.offset() >= 0);
        }
    }

    #[test]
    fn setters_clamp_negative_input() {
        let mut c: Collection<()> = Collection::new(25);
        c.set_pointer(-3);
        c.set_count(-10);
        assert_eq!(c.pointer(), 0);
        assert_eq!(c.count(), 0);
        assert_eq!(c.page_count(), 0);
    }

    #[test]
    fn limit_is_kept_positive() {
        let c: Collection<()> = Collection::new(0);
        assert_eq!(c.limit(), 1);
    }

    #[test]
    fn out_of_bounds_only_past_the_last_page() {
        assert!(!collection(25, 100, 1).is_out_of_bounds());
        assert!(!collection(25, 100, 2).is_out_of_bounds());
        assert!(!collection(25, 100, 4).is_out_of_bounds());
        assert!(collection(25, 100, 5).is_out_of_bounds());
        assert!(collection(25, 0, 1).is_out_of_bounds());
    }

    #[test]
    fn extreme_inputs_stay_in_range() {
        let c = collection(25, i64::MAX, i64::MAX);
        assert_eq!(c.page_count(), i64::MAX / 25 + 1);
        assert_eq!(c.offset(), i64::MAX);
        assert!(c.is_out_of_bounds());

        let c = collection(i64::MAX, i64::MAX, 1);
        assert_eq!(c.page_count(), 1);
        assert_eq!(c.offset(), 0);

        let c = collection(i64::MAX, 1, 2);
        assert_eq!(c.page_count(), 1);
        assert_eq!(c.offset(), i64::MAX);
    }

    #[test]
    fn grab_recomputes_page_count() {
        let mut c = Collection::new(2);
        c.grab(vec!["a", "b"], 1, 5);
        assert_eq!(c.meta().page_count, 3);
        assert_eq!(c.records(), &["a", "b"]);
    }

    #[test]
    fn serializes_meta_and_collection() {
        let mut c = Collection::new(25);
        c.grab(vec![json!({"uuid": "abcdefgh"})], 2, 30);
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({
                "meta": { "page": 2, "pageCount": 2, "records": 30, "recordsPerPage": 25 },
                "collection": [{ "uuid": "abcdefgh" }]
            })
        );
    }
}
