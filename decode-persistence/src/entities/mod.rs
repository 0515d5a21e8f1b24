pub mod prelude;

pub mod kv_hash_fields;
pub mod kv_sorted_set_members;
pub mod kv_strings;
