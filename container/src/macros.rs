//! Public macros for building resolution parameters.

/// Builds a [`Parameters`](crate::Parameters) map from `name => value` pairs.
///
/// Values go through `serde_json::Value::from`, so strings, integers, floats,
/// booleans and existing `Value`s are all accepted.
///
/// # Examples
///
/// ```
/// use trellis_container::params;
///
/// let params = params! { "name" => "custom", "value" => 99 };
/// assert_eq!(params.get_str("name"), Some("custom"));
/// assert_eq!(params.get_i64("value"), Some(99));
///
/// let empty = params! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! params {
  () => {
    $crate::Parameters::new()
  };

  ($($name:expr => $value:expr),+ $(,)?) => {{
    let mut parameters = $crate::Parameters::new();
    $(
      parameters.insert($name, $value);
    )+
    parameters
  }};
}
