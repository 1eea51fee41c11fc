/// Builds a `Vec<Value>` from expressions convertible into [`Value`](crate::Value).
///
/// Integer literals become [`Value::Int`](crate::Value::Int), float literals
/// [`Value::Float`](crate::Value::Float).
///
/// ```rust
/// use tabtree::{values, Value};
///
/// let list = values!["host", 8080, true, 0.5];
/// assert_eq!(
///     list,
///     vec![
///         Value::from("host"),
///         Value::Int(8080),
///         Value::Bool(true),
///         Value::Float(0.5),
///     ]
/// );
/// assert!(values![].is_empty());
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };

    ($($elem:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($elem)),+]
    };
}
