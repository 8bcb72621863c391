/// Round to the nearest integer with halves going toward positive infinity.
///
/// This matches the browser's `Math.round`, which the published data files and
/// the map front-end both rely on; `f64::round` would send `-2.5` to `-3`.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::round_half_up;

    #[test]
    fn halves_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(49.4), 49.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }
}
