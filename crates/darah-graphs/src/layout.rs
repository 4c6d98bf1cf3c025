//! Splitting the state list into 2x2 grid pages

use darah_common::join_names;

/// States per grid image
pub const STATES_PER_GRID: usize = 4;

/// Consecutive groups of at most [`STATES_PER_GRID`] items
pub fn chunk_states<T>(items: &[T]) -> Vec<&[T]> {
    items.chunks(STATES_PER_GRID).collect()
}

/// `"State"` or `"States"` depending on how many names follow
pub fn state_noun(count: usize) -> &'static str {
    if count > 1 {
        "States"
    } else {
        "State"
    }
}

/// `"<prefix> State[s] (A, B)"`
pub fn grid_title<S: AsRef<str>>(prefix: &str, states: &[S]) -> String {
    format!("{} {} ({})", prefix, state_noun(states.len()), join_names(states))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_states() {
        let states: Vec<u32> = (0..13).collect();
        let chunks = chunk_states(&states);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], &[0, 1, 2, 3]);
        assert_eq!(chunks[3], &[12]);

        assert!(chunk_states::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_grid_title_pluralisation() {
        assert_eq!(
            grid_title("Total Annual Blood Donations by", &["Johor", "Kedah"]),
            "Total Annual Blood Donations by States (Johor, Kedah)"
        );
        assert_eq!(
            grid_title("Average Daily Blood Donations for", &["W.P. Labuan"]),
            "Average Daily Blood Donations for State (W.P. Labuan)"
        );
    }
}
