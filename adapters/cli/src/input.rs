//! Translation of typed lines into world commands.

use world_of_bits_core::{CellId, Command, GeoPoint};

/// Meaning of a single line typed by the player.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    /// Line maps onto a world command.
    Command(Command),
    /// Redraw the map without changing anything.
    Look,
    /// Print the command reference.
    Help,
    /// Leave the session.
    Quit,
    /// Blank line.
    Empty,
    /// Line could not be understood; carries a short reason.
    Unknown(String),
}

/// Command reference shown by `help`.
pub(crate) const HELP: &str = "\
commands:
  w | a | s | d            step one cell north, west, south or east
  up | left | down | right same as w, a, s, d
  goto <lat> <lng> [deg]   jump to a coordinate, optionally facing a heading
  click <x> <y>            interact with the cell at absolute coordinates
  click <x>,<y>            same, using a cell key
  here <dx> <dy>           interact with the cell offset from the player
  look                     redraw the map
  reset                    discard the session and start over
  help                     show this reference
  quit                     leave";

/// Parses a line typed by the player standing in `player_cell`.
pub(crate) fn parse_line(line: &str, player_cell: CellId) -> Input {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Input::Empty;
    };
    let args: Vec<&str> = words.collect();

    let step = |dx, dy| Input::Command(Command::Move { dx, dy });
    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("w" | "up" | "north", []) => step(0, 1),
        ("s" | "down" | "south", []) => step(0, -1),
        ("a" | "left" | "west", []) => step(-1, 0),
        ("d" | "right" | "east", []) => step(1, 0),
        ("goto", [lat, lng, rest @ ..]) if rest.len() <= 1 => parse_goto(lat, lng, rest.first()),
        ("click", [key]) => match key.parse::<CellId>() {
            Ok(cell) => Input::Command(Command::ClickCell { cell }),
            Err(error) => Input::Unknown(error.to_string()),
        },
        ("click", [x, y]) => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Input::Command(Command::ClickCell {
                cell: CellId::new(x, y),
            }),
            _ => Input::Unknown(format!("'{x} {y}' are not cell coordinates")),
        },
        ("here", [dx, dy]) => match (dx.parse(), dy.parse()) {
            (Ok(dx), Ok(dy)) => Input::Command(Command::ClickCell {
                cell: player_cell.offset(dx, dy),
            }),
            _ => Input::Unknown(format!("'{dx} {dy}' are not cell offsets")),
        },
        ("look", []) => Input::Look,
        ("reset", []) => Input::Command(Command::Reset),
        ("help" | "?", []) => Input::Help,
        ("quit" | "exit" | "q", []) => Input::Quit,
        _ => Input::Unknown(format!("unrecognised command '{}'", line.trim())),
    }
}

fn parse_goto(lat: &str, lng: &str, heading: Option<&&str>) -> Input {
    let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) else {
        return Input::Unknown(format!("'{lat} {lng}' is not a coordinate"));
    };
    let heading_deg = match heading.map(|value| value.parse::<f64>()) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => return Input::Unknown("heading must be a number of degrees".to_owned()),
    };
    Input::Command(Command::MoveTo {
        point: GeoPoint::new(lat, lng),
        heading_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERE: CellId = CellId::new(10, -4);

    fn command(line: &str) -> Command {
        match parse_line(line, HERE) {
            Input::Command(command) => command,
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn steps_map_to_unit_moves() {
        assert_eq!(command("w"), Command::Move { dx: 0, dy: 1 });
        assert_eq!(command("  LEFT "), Command::Move { dx: -1, dy: 0 });
        assert_eq!(command("s"), Command::Move { dx: 0, dy: -1 });
        assert_eq!(command("right"), Command::Move { dx: 1, dy: 0 });
    }

    #[test]
    fn goto_accepts_optional_heading() {
        assert_eq!(
            command("goto 36.99 -122.06"),
            Command::MoveTo {
                point: GeoPoint::new(36.99, -122.06),
                heading_deg: None,
            }
        );
        assert_eq!(
            command("goto 1 2 -90"),
            Command::MoveTo {
                point: GeoPoint::new(1.0, 2.0),
                heading_deg: Some(-90.0),
            }
        );
        assert!(matches!(parse_line("goto 1 2 east", HERE), Input::Unknown(_)));
        assert!(matches!(parse_line("goto 1", HERE), Input::Unknown(_)));
    }

    #[test]
    fn click_takes_coordinates_or_keys() {
        let expected = Command::ClickCell {
            cell: CellId::new(-3, 7),
        };
        assert_eq!(command("click -3 7"), expected);
        assert_eq!(command("click -3,7"), expected);
        assert!(matches!(parse_line("click 03,7", HERE), Input::Unknown(_)));
        assert!(matches!(parse_line("click x 7", HERE), Input::Unknown(_)));
    }

    #[test]
    fn here_is_relative_to_player_cell() {
        assert_eq!(
            command("here 1 0"),
            Command::ClickCell {
                cell: CellId::new(11, -4),
            }
        );
    }

    #[test]
    fn session_verbs_are_recognised() {
        assert_eq!(command("reset"), Command::Reset);
        assert_eq!(parse_line("look", HERE), Input::Look);
        assert_eq!(parse_line("help", HERE), Input::Help);
        assert_eq!(parse_line("quit", HERE), Input::Quit);
        assert_eq!(parse_line("   ", HERE), Input::Empty);
        assert!(matches!(parse_line("dance", HERE), Input::Unknown(_)));
        assert!(matches!(parse_line("w 3", HERE), Input::Unknown(_)));
    }
}
