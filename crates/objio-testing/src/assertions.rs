//! Common assertions for objio testing

use objio::{Layer, MultiError};

/// Asserts that a close failed in exactly `layers`, in teardown order
pub fn assert_failed_layers(err: &MultiError, layers: &[Layer]) {
    assert_eq!(
        err.layers(),
        layers,
        "Unexpected failing layers in close error: {}",
        err
    );
}

/// Asserts that a close error mentions every one of `fragments`
pub fn assert_mentions_all(err: &MultiError, fragments: &[&str]) {
    let message = err.to_string();
    for fragment in fragments {
        assert!(
            message.contains(fragment),
            "Close error {:?} does not mention {:?}",
            message,
            fragment
        );
    }
}
