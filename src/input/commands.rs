use crate::listing::FilterDef;

pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "documents",
        aliases: &["docs"],
        description: "Switch to documents",
    },
    CommandDef {
        name: "members",
        aliases: &["mem"],
        description: "Switch to members",
    },
    CommandDef {
        name: "users",
        aliases: &["usr"],
        description: "Switch to member users",
    },
    CommandDef {
        name: "links",
        aliases: &["ln"],
        description: "Switch to links",
    },
    CommandDef {
        name: "filter",
        aliases: &["f"],
        description: "Set or clear a filter (e.g. :filter status 2)",
    },
    CommandDef {
        name: "reset",
        aliases: &[],
        description: "Clear all filters and the search",
    },
    CommandDef {
        name: "page",
        aliases: &["p"],
        description: "Jump to a page (e.g. :page 3)",
    },
    CommandDef {
        name: "size",
        aliases: &[],
        description: "Rows per page (e.g. :size 20)",
    },
    CommandDef {
        name: "open",
        aliases: &["goto"],
        description: "Open a link (e.g. :open safta://admin/links?status=1)",
    },
    CommandDef {
        name: "refresh",
        aliases: &["r"],
        description: "Reload the current page",
    },
    CommandDef {
        name: "logout",
        aliases: &[],
        description: "Sign out and quit",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit safta-admin",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

/// Exact lookup by name or alias.
pub fn find_command(word: &str) -> Option<&'static CommandDef> {
    let word = word.to_lowercase();
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == word || cmd.aliases.contains(&word.as_str()))
}

/// Untyped remainder of the command word, or of the filter name after
/// `filter`, that Tab inserts.
pub fn completion(defs: &[FilterDef], buffer: &str) -> Option<String> {
    let (typed, candidate) = match buffer.split_once(' ') {
        None => (buffer, matching_commands(buffer).first()?.name),
        Some((word, args)) => {
            if find_command(word)?.name != "filter" || args.is_empty() || args.contains(' ') {
                return None;
            }
            (args, defs.iter().find(|def| def.name.starts_with(args))?.name)
        }
    };
    if typed.is_empty() {
        return None;
    }
    candidate
        .strip_prefix(typed)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{kind_spec, KindId};

    #[test]
    fn test_matching_commands() {
        assert_eq!(matching_commands("mem").len(), 1);
        assert_eq!(matching_commands("mem")[0].name, "members");

        assert_eq!(matching_commands("docs")[0].name, "documents");
        assert_eq!(matching_commands("usr")[0].name, "users");

        assert_eq!(matching_commands("l").len(), 2); // links + logout
        assert_eq!(matching_commands("ln")[0].name, "links");

        assert_eq!(matching_commands("q").len(), 1);
        assert_eq!(matching_commands("q")[0].name, "quit");

        assert_eq!(matching_commands("re").len(), 2); // reset + refresh
        assert!(matching_commands("xyz").is_empty());
    }

    #[test]
    fn find_by_alias() {
        assert_eq!(find_command("f").map(|c| c.name), Some("filter"));
        assert_eq!(find_command("Goto").map(|c| c.name), Some("open"));
        assert!(find_command("fil").is_none());
    }

    #[test]
    fn completion_covers_commands_and_filter_names() {
        let links = kind_spec(KindId::Links).filters;
        assert_eq!(completion(links, "mem").as_deref(), Some("bers"));
        assert_eq!(completion(links, "filter wor").as_deref(), Some("kgroup"));
        assert_eq!(completion(links, "f sta").as_deref(), Some("rt_date"));
        assert_eq!(completion(links, "filter workgroup"), None);
        assert_eq!(completion(links, "filter workgroup 5"), None);
        assert_eq!(completion(links, "page 2"), None);
        assert_eq!(completion(links, ""), None);
    }
}
