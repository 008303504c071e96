use super::*;
use wb_core::*;

/// Flat end-of-game payout for one player.
///
/// Every member of the winning faction scores, eliminated or not: crew on
/// a crew win, blur and blank on a blur win. Everyone else gets nothing.
pub fn payout(role: Role, winner: Faction) -> Points {
    match (winner, role) {
        (Faction::Crew, Role::Crew) => CREW_AWARD,
        (Faction::Blur, Role::Blur) => BLUR_AWARD,
        (Faction::Blur, Role::Blank) => BLANK_AWARD,
        _ => 0,
    }
}
