/// What a single poll cycle did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Listing pages fetched successfully.
    pub pages: usize,
    /// Entries seen across those pages.
    pub listed: usize,
    /// Addition handler calls that succeeded.
    pub added: usize,
    /// Entries skipped because their marker was unchanged.
    pub unchanged: usize,
    /// Removal handler calls that succeeded.
    pub removed: usize,
    /// Fetch, listing, and handler failures.
    pub failures: usize,
    /// `false` if a listing page failed; removal detection was then skipped.
    pub listing_complete: bool,
}

impl CycleReport {
    /// Returns `true` if the cycle changed nothing and hit no errors.
    pub fn is_quiet(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.failures == 0
    }
}
