// Mirrors migrations/2025-01-01-000000_create_records/up.sql.

diesel::table! {
    changes (id) {
        id -> BigInt,
        entity_type -> Text,
        business_id -> Text,
        operation -> Text,
        source -> Text,
        actor -> Nullable<Text>,
        reason -> Nullable<Text>,
        timestamp -> BigInt,
    }
}

diesel::table! {
    records (collection, business_id) {
        collection -> Text,
        business_id -> Text,
        payload -> Text,
        updated_at -> BigInt,
    }
}

diesel::allow_tables_to_appear_in_same_query!(changes, records);
