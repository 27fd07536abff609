//! Converts clock state into a per-move time budget. Distinct from
//! `uci::time_control::TimeControl`, which only parses the UCI `go` command
//! syntax; this is the actual allocation policy.

/// `allocate(remaining_time_s, increment_s, fullmove_number) -> budget_s`.
pub fn allocate(remaining_time_s: f32, increment_s: f32, fullmove_number: u32) -> f32 {
    let moves_left = if fullmove_number < 10 {
        40.0
    } else if fullmove_number < 30 {
        30.0
    } else {
        20.0
    };

    let base = remaining_time_s / moves_left + 0.8 * increment_s;
    let max_time = 0.2 * remaining_time_s;
    let min_time = (0.5_f32).min(0.05 * remaining_time_s);

    base.clamp(min_time, max_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_the_max_fraction_of_remaining_time() {
        let budget = allocate(60.0, 0.0, 1);
        assert!(budget <= 0.2 * 60.0 + 1e-6);
    }

    #[test]
    fn never_drops_below_the_min_floor() {
        let budget = allocate(1.0, 0.0, 1);
        assert!(budget >= (0.5_f32).min(0.05) - 1e-6);
    }

    #[test]
    fn later_game_assumes_fewer_moves_left() {
        let early = allocate(600.0, 0.0, 5);
        let late = allocate(600.0, 0.0, 35);
        assert!(late > early);
    }

    #[test]
    fn increment_raises_the_budget() {
        let without = allocate(60.0, 0.0, 1);
        let with = allocate(60.0, 2.0, 1);
        assert!(with > without);
    }
}
