/// My ternary expression handler.  While it may seem redundant, it's
/// surprisingly useful for the edge (literally) cases of the seam
/// search, where the candidate columns are clamped to the row.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
