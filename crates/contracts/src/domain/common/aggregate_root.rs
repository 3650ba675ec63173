/// Root of an aggregate exposed by the API
///
/// Records are owned by the remote API; this trait only carries what the
/// dashboard needs to address them: an id, tab keys and endpoint paths.
pub trait AggregateRoot {
    /// Record id as issued by the API
    fn id(&self) -> &str;

    /// Short business code shown in tab titles (e.g. "BK-2026-0012")
    fn code(&self) -> &str {
        self.id()
    }

    // ============================================================================
    // Static metadata
    // ============================================================================

    /// Aggregate index (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Singular snake_case name (e.g. "booking")
    fn entity_key() -> &'static str;

    /// REST collection segment (e.g. "bookings")
    fn collection_name() -> &'static str;

    /// UI name, singular
    fn element_name() -> &'static str;

    /// UI name, plural
    fn list_name() -> &'static str;

    // ============================================================================
    // Derived
    // ============================================================================

    /// Full name used as the list tab key (e.g. "a001_booking")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::entity_key())
    }

    /// Tab key of the detail page for one record
    fn detail_tab_key(id: &str) -> String {
        format!("{}_detail_{}", Self::full_name(), id)
    }

    /// Tab key of the creation form
    fn new_tab_key() -> String {
        format!("{}_new", Self::full_name())
    }

    /// Collection endpoint (e.g. "/api/bookings")
    fn api_path() -> String {
        format!("/api/{}", Self::collection_name())
    }

    /// Record endpoint (e.g. "/api/bookings/42")
    fn api_item_path(id: &str) -> String {
        format!("{}/{}", Self::api_path(), id)
    }
}
