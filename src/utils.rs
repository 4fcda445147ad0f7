//! Helpers shared by tests across the library

/// Assert that two scalars are equal up to [`EPSILON`](crate::EPSILON) or provided tolerance
#[macro_export]
macro_rules! assert_approx_eq {
    ( $v0:expr, $v1: expr ) => {{
        assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
    }};
    ( $v0:expr, $v1: expr, $e: expr ) => {{
        assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
    }};
}
