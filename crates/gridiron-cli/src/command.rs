// Console command parsing.

use gridiron_core::{PlayerTag, Position, ScoreMode};

/// Default row count for `best`.
pub const DEFAULT_BEST_LIMIT: usize = 10;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Draft a player for the team on the clock.
    Draft(String),
    /// Draft the n-th (1-based) candidate from the last ambiguous lookup.
    Choose(usize),
    Suggest(Option<u32>),
    /// Auto-draft the current pick.
    Auto,
    /// Auto-draft until the operator's turn, or at most `n` picks.
    AutoDraft(Option<u32>),
    Best {
        position: Option<Position>,
        limit: usize,
    },
    Find(String),
    Needs(Option<u32>),
    Roster(Option<u32>),
    Board,
    Next,
    Undo,
    Rename {
        team: u32,
        name: String,
    },
    ToggleNames,
    Tag {
        tag: PlayerTag,
        query: String,
    },
    Untag {
        tag: PlayerTag,
        query: String,
    },
    Tags(Option<PlayerTag>),
    Stats {
        query: String,
        available_only: bool,
    },
    Source(ScoreMode),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type `help` for the list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Commands:
  draft <name>           draft a player for the team on the clock
  choose <n>             pick candidate n from the last ambiguous name
  suggest [team]         ranked suggestions (default: your team)
  auto                   auto-draft the current pick
  autodraft [n]          auto-draft until your turn (or n picks)
  best [POS] [N]         best available, optionally by position
  find <text>            search available players
  needs [team]           positional needs
  roster [team]          a team's roster
  board                  the draft board
  next                   your next pick number
  undo                   take back the last pick
  rename <team> <name>   name a team
  names                  toggle team names / numbers
  tag <fav|bust> <name>  tag a player
  untag <fav|bust> <name>
  tags [fav|bust]        list tagged players
  stats [-a] <name>      historical stats (-a: available players only)
  source <rank|points>   switch the player source
  help                   this list
  quit                   leave (picks are saved as they are made)";

fn parse_team(arg: Option<&str>, usage: &'static str) -> Result<Option<u32>, CommandError> {
    match arg {
        None => Ok(None),
        Some(s) => s.parse::<u32>().map(Some).map_err(|_| CommandError::Usage(usage)),
    }
}

fn parse_tag(arg: Option<&str>, usage: &'static str) -> Result<PlayerTag, CommandError> {
    arg.and_then(PlayerTag::from_str_tag)
        .ok_or(CommandError::Usage(usage))
}

fn rest_of(words: &[&str], usage: &'static str) -> Result<String, CommandError> {
    let text = words.join(" ");
    if text.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(text)
    }
}

/// Parse a line. Blank input yields `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match head.to_lowercase().as_str() {
        "draft" | "d" => Command::Draft(rest_of(args, "draft <player name>")?),
        "choose" | "c" => {
            let n = args
                .first()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n >= 1)
                .ok_or(CommandError::Usage("choose <candidate number>"))?;
            Command::Choose(n)
        }
        "suggest" | "s" => Command::Suggest(parse_team(args.first().copied(), "suggest [team]")?),
        "auto" => Command::Auto,
        "autodraft" => {
            let n = parse_team(args.first().copied(), "autodraft [number of picks]")?;
            Command::AutoDraft(n)
        }
        "best" | "b" => {
            let mut position = None;
            let mut limit = DEFAULT_BEST_LIMIT;
            for arg in args {
                if let Some(pos) = Position::from_str_pos(arg) {
                    position = Some(pos);
                } else if let Ok(n) = arg.parse::<usize>() {
                    limit = n;
                } else {
                    return Err(CommandError::Usage("best [POS] [N]"));
                }
            }
            Command::Best { position, limit }
        }
        "find" | "f" => Command::Find(rest_of(args, "find <text>")?),
        "needs" => Command::Needs(parse_team(args.first().copied(), "needs [team]")?),
        "roster" | "r" => Command::Roster(parse_team(args.first().copied(), "roster [team]")?),
        "board" => Command::Board,
        "next" => Command::Next,
        "undo" => Command::Undo,
        "rename" => {
            let usage = "rename <team> <name>";
            let team = parse_team(args.first().copied(), usage)?.ok_or(CommandError::Usage(usage))?;
            let name = rest_of(args.get(1..).unwrap_or_default(), usage)?;
            Command::Rename { team, name }
        }
        "names" => Command::ToggleNames,
        "tag" | "untag" => {
            let usage = if head.eq_ignore_ascii_case("tag") {
                "tag <fav|bust> <player name>"
            } else {
                "untag <fav|bust> <player name>"
            };
            let tag = parse_tag(args.first().copied(), usage)?;
            let query = rest_of(args.get(1..).unwrap_or_default(), usage)?;
            if head.eq_ignore_ascii_case("tag") {
                Command::Tag { tag, query }
            } else {
                Command::Untag { tag, query }
            }
        }
        "tags" => match args.first() {
            None => Command::Tags(None),
            Some(_) => Command::Tags(Some(parse_tag(args.first().copied(), "tags [fav|bust]")?)),
        },
        "stats" => {
            let available_only = matches!(args.first(), Some(&"-a") | Some(&"--available"));
            let words = if available_only { &args[1..] } else { args };
            Command::Stats {
                query: rest_of(words, "stats [-a] <player name>")?,
                available_only,
            }
        }
        "source" => match args.first().map(|s| s.to_lowercase()).as_deref() {
            Some("rank") | Some("rankings") => Command::Source(ScoreMode::Rank),
            Some("points") | Some("projections") => Command::Source(ScoreMode::Points),
            _ => return Err(CommandError::Usage("source <rank|points>")),
        },
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn draft_keeps_full_name() {
        assert_eq!(parse("draft  Amon-Ra  St. Brown"), Command::Draft("Amon-Ra St. Brown".into()));
        assert_eq!(parse_command("draft"), Err(CommandError::Usage("draft <player name>")));
    }

    #[test]
    fn best_arguments_in_any_order() {
        assert_eq!(parse("best"), Command::Best { position: None, limit: DEFAULT_BEST_LIMIT });
        assert_eq!(
            parse("best rb 5"),
            Command::Best { position: Some(Position::RunningBack), limit: 5 }
        );
        assert_eq!(
            parse("best 3 DST"),
            Command::Best { position: Some(Position::Defense), limit: 3 }
        );
        assert!(parse_command("best lb").is_err());
    }

    #[test]
    fn team_arguments() {
        assert_eq!(parse("needs"), Command::Needs(None));
        assert_eq!(parse("roster 4"), Command::Roster(Some(4)));
        assert_eq!(parse("autodraft 6"), Command::AutoDraft(Some(6)));
        assert!(parse_command("suggest four").is_err());
        assert_eq!(
            parse("rename 2 The Replacements"),
            Command::Rename { team: 2, name: "The Replacements".into() }
        );
        assert!(parse_command("rename 2").is_err());
    }

    #[test]
    fn tags_and_stats() {
        assert_eq!(
            parse("tag fav Puka Nacua"),
            Command::Tag { tag: PlayerTag::Favorite, query: "Puka Nacua".into() }
        );
        assert_eq!(
            parse("untag bust Puka"),
            Command::Untag { tag: PlayerTag::Bust, query: "Puka".into() }
        );
        assert_eq!(parse("tags"), Command::Tags(None));
        assert_eq!(parse("tags bust"), Command::Tags(Some(PlayerTag::Bust)));
        assert!(parse_command("tag sleeper Puka").is_err());
        assert_eq!(
            parse("stats -a josh"),
            Command::Stats { query: "josh".into(), available_only: true }
        );
        assert_eq!(
            parse("stats Josh Allen"),
            Command::Stats { query: "Josh Allen".into(), available_only: false }
        );
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse("choose 2"), Command::Choose(2));
        assert!(parse_command("choose 0").is_err());
        assert_eq!(parse("source points"), Command::Source(ScoreMode::Points));
        assert_eq!(parse("QUIT"), Command::Quit);
        assert_eq!(
            parse_command("punt"),
            Err(CommandError::Unknown("punt".into()))
        );
    }
}
