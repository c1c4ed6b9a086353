// Prompt line parsing.
//
// Translates one line of user input into a Command for the main loop.
// Parsing never touches the session; errors carry a message for the prompt.

use riftdraft_core::draft::{Role, Side};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select { side: Side, role: Role },
    Assign { side: Side, role: Role, champion: String },
    /// Assign the first catalog match to the selected role.
    Pick { query: String },
    Hover { side: Side, role: Role },
    Details { side: Side, role: Role },
    Predict,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  select <side> <role>             focus a role for `pick`
  assign <side> <role> <champion>  put a champion in a role (empty clears)
  pick <query>                     assign first champion matching query
  hover <side> <role>              matchup suggestions for a role
  details <side> <role>            open the detail panel for a filled role
  predict                          team win-rate prediction
  show                             print both rosters and panels
  help                             this text
  quit                             exit
sides: blue, red   roles: top, jungle, mid, bottom (adc), support";

/// Parse one prompt line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "select" | "s" => {
            let (side, role) = side_role(verb, &rest)?;
            Command::Select { side, role }
        }
        "assign" | "a" => {
            let (side, role) = side_role(verb, &rest)?;
            Command::Assign {
                side,
                role,
                champion: rest[2..].join(" "),
            }
        }
        "pick" | "p" => {
            if rest.is_empty() {
                return Err("usage: pick <query>".to_string());
            }
            Command::Pick {
                query: rest.join(" "),
            }
        }
        "hover" | "h" => {
            let (side, role) = side_role(verb, &rest)?;
            Command::Hover { side, role }
        }
        "details" | "d" => {
            let (side, role) = side_role(verb, &rest)?;
            Command::Details { side, role }
        }
        "predict" => Command::Predict,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; try `help`")),
    };
    Ok(Some(command))
}

fn side_role(verb: &str, args: &[&str]) -> Result<(Side, Role), String> {
    let (Some(side), Some(role)) = (args.first(), args.get(1)) else {
        return Err(format!("usage: {verb} <side> <role>"));
    };
    let side = Side::from_str_side(side).ok_or_else(|| format!("unknown side {side:?}"))?;
    let role = Role::from_str_role(role).ok_or_else(|| format!("unknown role {role:?}"))?;
    Ok((side, role))
}
