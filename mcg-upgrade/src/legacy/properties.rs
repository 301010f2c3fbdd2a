//! Split `.properties` / `.env` level settings

/// Merge env lines after the existing properties lines
///
/// A level with no properties file yet passes an empty `properties` list.
/// Properties that already end with the env lines are returned unchanged, so
/// a merge interrupted before the `.env` was removed is not appended twice.
pub fn merge_property_lines(mut properties: Vec<String>, env: Vec<String>) -> Vec<String> {
    if properties.ends_with(&env) {
        return properties;
    }
    properties.extend(env);
    properties
}
