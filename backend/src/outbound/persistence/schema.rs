//! Diesel table definitions for the order sync schema.
//!
//! These definitions must match `migrations/` exactly. `orders` is not
//! declared here: its `point` column has no Diesel mapping, so the order
//! repository writes it with raw SQL.

diesel::table! {
    /// Tenants whose delivery orders are synchronised.
    organizations (id) {
        /// Primary key: UUID identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Upstream API login; tenants without one are not synchronised.
        iiko_api_login -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Last processed upstream revision, one row per tenant.
    order_revisions (organization_id) {
        /// Owning tenant.
        organization_id -> Uuid,
        /// Revision watermark.
        revision -> Int8,
        /// Last write timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(order_revisions -> organizations (organization_id));
diesel::allow_tables_to_appear_in_same_query!(organizations, order_revisions);
