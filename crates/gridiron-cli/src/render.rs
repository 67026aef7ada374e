// Plain-text rendering of draft views for the console.

use std::fmt::Write as _;

use gridiron_core::{
    BoardSlot, DraftState, Need, PlayerRecord, Position, ScoreMode, Suggestion, TaggedPlayer,
};
use gridiron_data::PlayerHistory;

/// Score column for a record in the active mode.
fn score_text(player: &PlayerRecord, mode: ScoreMode) -> String {
    match mode {
        ScoreMode::Rank => format!("rank {}", player.score),
        ScoreMode::Points => format!("{:.1} pts", player.score),
    }
}

/// "Name (POS, TEAM) bye N - rank R"
pub fn player_line(player: &PlayerRecord, mode: ScoreMode) -> String {
    let mut line = player.to_string();
    if !player.bye.is_empty() {
        let _ = write!(line, " bye {}", player.bye);
    }
    let _ = write!(line, " - {}", score_text(player, mode));
    line
}

pub fn numbered_players(players: &[PlayerRecord], mode: ScoreMode) -> String {
    if players.is_empty() {
        return "No players.".to_string();
    }
    players
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>3}. {}", i + 1, player_line(p, mode)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick counter, team on the clock, and the operator's next turn.
pub fn status(state: &DraftState) -> String {
    if state.is_complete() {
        return format!("Draft complete: all {} picks made.", state.total_picks());
    }
    let drafter = state.current_drafter();
    let mut out = format!(
        "Pick {} of {} (round {}) - {} on the clock",
        state.current_pick(),
        state.total_picks(),
        state.current_round(),
        state.team_label(drafter)
    );
    if state.is_my_turn() {
        out.push_str("\nIT'S YOUR PICK!");
        if let Ok(next) = state.next_pick_for_team(drafter) {
            let _ = write!(out, " Your following pick: {next}");
        }
    }
    out
}

pub fn needs(label: &str, needs: &[Need], slots: &[(Position, usize)]) -> String {
    let mut out = format!("Needs for {label}:");
    if needs.is_empty() {
        out.push_str(" none");
    }
    for need in needs {
        let _ = write!(out, "\n  {}: {}", need.position, need.priority);
    }
    if !slots.is_empty() {
        let open: Vec<String> = slots.iter().map(|(pos, n)| format!("{pos} {n}")).collect();
        let _ = write!(out, "\nOpen roster spots: {}", open.join(", "));
    }
    out
}

pub fn roster(state: &DraftState, team: u32) -> String {
    let Ok(roster) = state.team(team) else {
        return format!("No team {team}.");
    };
    let mut out = format!("{} ({} players)", state.team_label(team), roster.len());
    if roster.is_empty() {
        out.push_str("\n  (empty)");
        return out;
    }
    let counts: Vec<String> = roster
        .position_counts()
        .iter()
        .map(|(pos, n)| format!("{pos} {n}"))
        .collect();
    let _ = write!(out, "\n  {}", counts.join(" | "));
    for player in roster.players() {
        let _ = write!(out, "\n  {}", player_line(player, state.score_mode()));
    }
    out
}

pub fn suggestions(list: &[Suggestion], mode: ScoreMode) -> String {
    if list.is_empty() {
        return "No suggestions: the pool is empty.".to_string();
    }
    list.iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{:>3}. {} [score {:.2}, {}]",
                i + 1,
                player_line(&s.player, mode),
                s.score,
                s.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn board(state: &DraftState, rows: &[Vec<BoardSlot>]) -> String {
    let mut out = String::new();
    for row in rows {
        let Some(first) = row.first() else { continue };
        let _ = write!(out, "Round {}", first.round);
        for slot in row {
            let who = slot
                .player
                .as_ref()
                .map(|p| format!("{} ({})", p.name, p.position))
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(
                out,
                "\n  #{:<4} {:<16} {}",
                slot.pick_number,
                state.team_label(slot.team_number),
                who
            );
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn tagged(state: &DraftState, list: &[TaggedPlayer]) -> String {
    if list.is_empty() {
        return "No tagged players.".to_string();
    }
    list.iter()
        .map(|t| {
            let status = match t.drafted_by {
                Some(team) => format!("drafted by {}", state.team_label(team)),
                None => "available".to_string(),
            };
            format!("  {} - {}", player_line(&t.player, state.score_mode()), status)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell<'a>(line: &'a gridiron_data::StatLine, column: &str) -> &'a str {
    match line.raw(column) {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

/// Season-by-season table plus career totals.
pub fn history(history: &PlayerHistory) -> String {
    let mut out = format!("Career statistics for {}", history.player);
    let quarterback = history.seasons.first().is_some_and(|s| s.is_quarterback());

    for s in &history.seasons {
        let _ = write!(
            out,
            "\n  {} {:<4} {:>2}/{:<2} G/GS",
            s.year,
            s.team,
            cell(s, "G"),
            cell(s, "GS")
        );
        if quarterback {
            let _ = write!(
                out,
                "  {}-{} {} yds {} TD {} INT ({:.1} Y/G, {:.1} Y/Cmp)  rush {} yds ({:.1} Y/G)",
                cell(s, "Cmp"),
                cell(s, "Att"),
                cell(s, "Yds"),
                cell(s, "TD"),
                cell(s, "Int"),
                s.passing_yards_per_game(),
                s.yards_per_completion(),
                cell(s, "RushYds"),
                s.rushing_yards_per_game()
            );
        } else {
            let _ = write!(
                out,
                "  rush {}-{} {} TD ({:.1} Y/G)  rec {}-{} {} TD ({:.1} Y/G)",
                cell(s, "RushAtt"),
                cell(s, "RushYds"),
                cell(s, "RushTD"),
                s.rushing_yards_per_game(),
                cell(s, "Rec"),
                cell(s, "RecYds"),
                cell(s, "RecTD"),
                s.receiving_yards_per_game()
            );
        }
        let _ = write!(out, "  {} PPR", cell(s, "PPR"));
    }

    let totals = history.career_totals();
    let _ = write!(
        out,
        "\n  Career: {} games, {} starts, {:.1} PPR",
        totals.games, totals.starts, totals.fantasy_points
    );
    out
}
