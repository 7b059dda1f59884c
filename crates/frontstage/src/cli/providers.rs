//! The `frontstage providers` command: list registered providers.

use frontstage_core::llm::{ProviderIdentity, PROVIDERS};

/// Execute the providers command.
pub fn execute() -> anyhow::Result<()> {
    println!("Registered providers:\n");
    for identity in PROVIDERS {
        println!("{}", line(identity, key_present(identity.key_env)));
    }
    println!("\nSelect one with `provider = \"<id>\"` under [ai] in the flow file.");
    Ok(())
}

fn key_present(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.is_empty())
}

fn line(identity: &ProviderIdentity, has_key: bool) -> String {
    let status = if has_key { "key set" } else { "key missing" };
    format!(
        "  - {:10} {:16} {:20} ({})",
        identity.id, identity.display_name, identity.key_env, status
    )
}
