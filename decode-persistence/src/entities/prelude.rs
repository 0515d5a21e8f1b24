pub use super::kv_hash_fields::Entity as KvHashFields;
pub use super::kv_sorted_set_members::Entity as KvSortedSetMembers;
pub use super::kv_strings::Entity as KvStrings;
