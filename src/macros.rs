/// Construct a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// ```rust
/// use confile::{con, Value};
///
/// let value = con!({
///     "name": "sensor-7",
///     "readings": [1, 2.5, null],
///     "active": true
/// });
/// assert_eq!(value.as_object().unwrap().len(), 3);
/// assert_eq!(con!([]), Value::Array(vec![]));
/// ```
///
/// Any other expression is converted with [`to_value`](crate::to_value),
/// falling back to Null if its `Serialize` impl fails.
#[macro_export]
macro_rules! con {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::con!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ConMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ConMap::new();
        $(
            object.insert($key.to_string(), $crate::con!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
