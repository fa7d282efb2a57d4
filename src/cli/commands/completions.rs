//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::StudyFocusError;

const BIN: &str = "studyfocus";

/// Generate the completion script, or installation instructions.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell, install: bool) -> Result<String, StudyFocusError> {
    if install {
        Ok(install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, StudyFocusError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN, &mut buf);
    String::from_utf8(buf).map_err(|e| StudyFocusError::Config(format!("UTF-8 error: {e}")))
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => format!(
            "# Add to ~/.bashrc:\nsource <({BIN} completions bash)\n"
        ),
        Shell::Zsh => format!(
            "# Save to your fpath:\n{BIN} completions zsh > ~/.zsh/completions/_{BIN}\n\
             # Then add to ~/.zshrc:\nfpath=(~/.zsh/completions $fpath)\nautoload -Uz compinit && compinit\n"
        ),
        Shell::Fish => format!(
            "# Save to fish completions directory:\n{BIN} completions fish > ~/.config/fish/completions/{BIN}.fish\n"
        ),
        Shell::PowerShell => format!(
            "# Add to your PowerShell profile ($PROFILE):\n{BIN} completions powershell | Out-String | Invoke-Expression\n"
        ),
        Shell::Elvish => format!(
            "# Save to elvish completions directory:\n{BIN} completions elvish > ~/.elvish/lib/{BIN}.elv\n"
        ),
        _ => format!("# Generate with: {BIN} completions <shell>\n"),
    }
}
