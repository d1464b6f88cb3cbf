//! Pure competition logic: standings and bracket generation.

mod bracket;
mod standings;

pub use bracket::{
    check_not_duplicate, generate_round_robin, generate_semifinals,
    generate_third_place_and_final, semifinal_outcome, FINAL_ROUND, SEMIFINAL_ROUND,
};
pub use standings::{compare_stats, recompute_standings};
