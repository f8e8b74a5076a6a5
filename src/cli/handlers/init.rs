// src/cli/handlers/init.rs

//! `dockhand init <shell>`: prints the aliases and completion hook to `eval`
//! from a shell rc file.

use crate::constants::BINARY_NAME;
use clap::ValueEnum;

/// Shells `init` can write a hook for.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// Native `complete -F`.
    Bash,
    /// Through `bashcompinit`.
    Zsh,
}

/// Renders the integration script for `shell` covering every verb.
pub fn render(shell: ShellKind, verbs: &[&str]) -> String {
    let mut script = String::new();
    if shell == ShellKind::Zsh {
        script.push_str("autoload -Uz bashcompinit && bashcompinit\n");
    }
    for verb in verbs {
        script.push_str(&format!("alias {verb}='{bin} {verb}'\n", verb = verb, bin = BINARY_NAME));
    }
    script.push_str(&format!(
        r#"_{bin}_complete() {{
    local verb="${{COMP_WORDS[0]}}"
    local cur="${{COMP_WORDS[COMP_CWORD]}}"
    case "${{COMP_WORDS[COMP_CWORD-1]}}" in
        -f|--file)
            COMPREPLY=( $(compgen -f -- "$cur") )
            return
            ;;
    esac
    local IFS=$'\n'
    COMPREPLY=( $({bin} complete "$verb" "${{COMP_WORDS[@]:1:COMP_CWORD}}" 2>/dev/null) )
}}
"#,
        bin = BINARY_NAME
    ));
    script.push_str(&format!("complete -F _{}_complete {}\n", BINARY_NAME, verbs.join(" ")));
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_defines_every_verb() {
        let script = render(ShellKind::Bash, &["d", "dcup"]);
        assert!(script.contains("alias d='dockhand d'\n"));
        assert!(script.contains("alias dcup='dockhand dcup'\n"));
        assert!(script.contains("dockhand complete \"$verb\""));
        assert!(script.ends_with("complete -F _dockhand_complete d dcup\n"));
        assert!(!script.contains("bashcompinit"));
        assert!(render(ShellKind::Zsh, &["d"]).starts_with("autoload -Uz bashcompinit"));
    }
}
