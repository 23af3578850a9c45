use console::style;
use miette::IntoDiagnostic;
use os_capabilities::{CapabilityFacts, CapabilityResolver, NativeQueries};

#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// Print the facts as JSON
    #[clap(long)]
    json: bool,
}

pub fn facts<Q: NativeQueries>(resolver: &CapabilityResolver<Q>, opt: Opt) -> miette::Result<()> {
    let facts = resolver.facts().into_diagnostic()?;
    if opt.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&facts).into_diagnostic()?
        );
    } else {
        print!("{}", render(&facts));
    }
    Ok(())
}

fn flag(value: bool) -> String {
    if value {
        style("yes").green().to_string()
    } else {
        style("no").red().to_string()
    }
}

fn render(facts: &CapabilityFacts) -> String {
    let version = &facts.os_version;
    let mut out = format!(
        "Windows {}.{}.{} ({:?})\n",
        version.major, version.minor, version.build, version.product_type
    );
    out.push_str(&format!("release:               {}\n", facts.release));
    out.push_str(&format!("windows 10:            {}\n", flag(facts.is_windows10)));
    out.push_str(&format!("workstation:           {}\n", flag(facts.is_workstation)));
    out.push_str(&format!(
        "package identity:      {}\n",
        facts.package_full_name.as_deref().unwrap_or("none")
    ));
    out.push_str(&format!(
        "protection api usable: {}\n",
        flag(facts.protection_api_usable)
    ));
    out.push_str(&format!("edgehtml present:      {}\n", flag(facts.edge_html_present)));
    for (release, value) in &facts.at_least {
        out.push_str(&format!("  at least {release:<15} {}\n", flag(*value)));
    }
    out
}

#[cfg(test)]
mod test {
    use os_capabilities::{OsVersionInfo, ProductType, Windows10Release};

    use super::*;

    #[test]
    fn test_render() {
        let facts = CapabilityFacts {
            os_version: OsVersionInfo {
                major: 10,
                minor: 0,
                build: 19041,
                product_type: ProductType::Server,
            },
            is_windows_nt: true,
            is_windows10: true,
            release: Windows10Release::May2020,
            at_least: Windows10Release::iter_named()
                .map(|release| (release, release <= Windows10Release::May2020))
                .collect(),
            is_workstation: false,
            has_package_identity: false,
            package_full_name: None,
            protection_api_usable: false,
            edge_html_present: false,
        };
        let rendered = console::strip_ansi_codes(&render(&facts)).to_string();
        assert!(rendered.starts_with("Windows 10.0.19041 (Server)\n"));
        assert!(rendered.contains("release:               May2020\n"));
        assert!(rendered.contains("package identity:      none\n"));
        assert!(rendered.contains("  at least November2019    yes\n"));
        assert!(rendered.contains("  at least September2020   no\n"));
    }
}
