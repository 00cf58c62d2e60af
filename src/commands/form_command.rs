use crate::form::TextField;
use std::str::FromStr;

pub const HELP_TEXT: &str = "可用命令: run | search [text] | set <field> <value> | isotope <id|custom|none> | unit <s|d|y> | check <name> | uncheck <name> | dataset <n|none> | save image | save json | settings | points | help | quit";

/// 命令行（按 / 进入）输入的表单操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Run,
    Search(Option<String>),
    Set { field: TextField, value: String },
    Isotope(String),
    Unit(String),
    Check(String),
    Uncheck(String),
    /// None 表示选择 "None" 选项
    Dataset(Option<usize>),
    SaveImage,
    SaveJson,
    ToggleSettings,
    TogglePoints,
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for FormCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(FormCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "run" | "r" => Ok(FormCommand::Run),
            "search" => {
                let text = parts[1..].join(" ");
                if text.is_empty() {
                    Ok(FormCommand::Search(None))
                } else {
                    Ok(FormCommand::Search(Some(text)))
                }
            }
            "set" => {
                let field = parts.get(1).and_then(|f| f.parse::<TextField>().ok());
                match field {
                    Some(field) => Ok(FormCommand::Set {
                        field,
                        value: parts[2..].join(" "),
                    }),
                    None => Ok(FormCommand::Unknown(
                        "用法: set <name|half_life|gamma|initial_amount|time_points|noise|isotope_search> <value>"
                            .to_string(),
                    )),
                }
            }
            "isotope" => match parts.get(1) {
                Some(&"none") => Ok(FormCommand::Isotope(String::new())),
                Some(id) => Ok(FormCommand::Isotope(id.to_string())),
                None => Ok(FormCommand::Unknown("用法: isotope <id|custom|none>".to_string())),
            },
            "unit" => match parts.get(1) {
                Some(unit) => Ok(FormCommand::Unit(unit.to_string())),
                None => Ok(FormCommand::Unknown("用法: unit <s|d|y>".to_string())),
            },
            "check" | "uncheck" => match parts.get(1) {
                Some(name) if parts[0] == "check" => Ok(FormCommand::Check(name.to_string())),
                Some(name) => Ok(FormCommand::Uncheck(name.to_string())),
                None => Ok(FormCommand::Unknown(format!("用法: {} <name>", parts[0]))),
            },
            "dataset" => match parts.get(1).copied() {
                Some("none") => Ok(FormCommand::Dataset(None)),
                Some(n) => match n.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(FormCommand::Dataset(Some(n - 1))),
                    _ => Ok(FormCommand::Unknown("用法: dataset <n|none>（n 从 1 开始）".to_string())),
                },
                None => Ok(FormCommand::Unknown("用法: dataset <n|none>".to_string())),
            },
            "save" => match parts.get(1).copied() {
                Some("image") | Some("png") => Ok(FormCommand::SaveImage),
                Some("json") => Ok(FormCommand::SaveJson),
                _ => Ok(FormCommand::Unknown("用法: save image | save json".to_string())),
            },
            "settings" => Ok(FormCommand::ToggleSettings),
            "points" => Ok(FormCommand::TogglePoints),
            "help" | "h" => Ok(FormCommand::Help),
            "quit" | "q" | "exit" => Ok(FormCommand::Quit),
            _ => Ok(FormCommand::Unknown(format!("未知命令: {}", parts[0]))),
        }
    }
}

/// 命令补全的候选
pub fn completion_hint(input: &str) -> Option<String> {
    let commands = [
        "run", "search", "set", "isotope", "unit", "check", "uncheck", "dataset", "save",
        "settings", "points", "help", "quit",
    ];
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() == 1 && !input.ends_with(' ') {
        return commands
            .iter()
            .find(|c| c.starts_with(parts[0]) && **c != parts[0])
            .map(|c| c[parts[0].len()..].to_string());
    }

    let subs: &[&str] = match parts[0] {
        "save" => &["image", "json"],
        "set" => &["name", "half_life", "gamma", "initial_amount", "time_points", "noise"],
        "unit" => &["s", "d", "y"],
        _ => return None,
    };
    let cur = if input.ends_with(' ') {
        ""
    } else {
        parts.get(1).copied().unwrap_or("")
    };
    if parts.len() > 2 || (parts.len() == 2 && input.ends_with(' ')) {
        return None;
    }
    subs.iter()
        .find(|s| s.starts_with(cur) && **s != cur)
        .map(|s| s[cur.len()..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> FormCommand {
        s.parse().unwrap()
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse("set name Test 1"),
            FormCommand::Set {
                field: TextField::CustomName,
                value: "Test 1".to_string()
            }
        );
        assert!(matches!(parse("set colour red"), FormCommand::Unknown(_)));
    }

    #[test]
    fn search_with_and_without_text() {
        assert_eq!(parse("search"), FormCommand::Search(None));
        assert_eq!(
            parse("search cobalt 60"),
            FormCommand::Search(Some("cobalt 60".to_string()))
        );
    }

    #[test]
    fn dataset_index_is_one_based() {
        assert_eq!(parse("dataset 1"), FormCommand::Dataset(Some(0)));
        assert_eq!(parse("dataset none"), FormCommand::Dataset(None));
        assert!(matches!(parse("dataset 0"), FormCommand::Unknown(_)));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse("save json"), FormCommand::SaveJson);
        assert_eq!(parse("save image"), FormCommand::SaveImage);
        assert_eq!(parse("isotope none"), FormCommand::Isotope(String::new()));
        assert_eq!(parse("check gamma"), FormCommand::Check("gamma".to_string()));
        assert_eq!(parse("uncheck gamma"), FormCommand::Uncheck("gamma".to_string()));
        assert_eq!(parse("q"), FormCommand::Quit);
        assert!(matches!(parse("launch"), FormCommand::Unknown(_)));
    }

    #[test]
    fn completion() {
        assert_eq!(completion_hint("se"), Some("arch".to_string()));
        assert_eq!(completion_hint("save "), Some("image".to_string()));
        assert_eq!(completion_hint("save j"), Some("son".to_string()));
        assert_eq!(completion_hint("run"), None);
        assert_eq!(completion_hint(""), None);
    }
}
