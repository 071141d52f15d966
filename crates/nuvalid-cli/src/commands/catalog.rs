use crate::error::Result;
use crate::utils::parser::CATALOG_KEYWORD;
use nuvalid::engine::quantity::Quantity;
use std::fmt::Write;

const PARAMETERISED: &[(&str, &str)] = &[
    (
        "leading-{proton|neutron|pion}-{momentum|ke|cos-theta|lepton-cos|lepton-dphi}[@KE]",
        "leading hadron observable above a kinetic-energy threshold in GeV",
    ),
    (
        "leading-pion-...:charged",
        "restrict the leading pion to π±",
    ),
    (
        "multiplicity:PDG[@KE]",
        "number of final-state particles of one species",
    ),
];

/// Renders the quantity table printed by `nuvalid catalog`.
pub fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<4} {:<18} TITLE",
        "NAME", "DIM", "HISTOGRAM KEY"
    );
    for name in Quantity::simple_names() {
        let Ok(quantity) = name.parse::<Quantity>() else {
            continue;
        };
        let info = quantity.info();
        let _ = writeln!(
            out,
            "{:<28} {:<4} {:<18} {}",
            name,
            format!("{}D", quantity.arity()),
            info.key,
            info.title
        );
    }

    let _ = writeln!(out, "\nParameterised forms:");
    for (form, description) in PARAMETERISED {
        let _ = writeln!(out, "  {form}\n      {description}");
    }
    let _ = writeln!(
        out,
        "\n'{CATALOG_KEYWORD}' in a quantity list expands to the {} reference distributions.",
        Quantity::reference_catalog().len()
    );
    out
}

pub fn run() -> Result<()> {
    print!("{}", render());
    Ok(())
}
