use clap::{Parser, Subcommand};

use self::{binomial::BinomialArg, ifr::IfrArg, poisson::PoissonArg};

mod binomial;
mod ifr;
mod poisson;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What interval to compute
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Clopper-Pearson interval on a binomial proportion
    Binomial(#[clap(flatten)] BinomialArg),
    /// Garwood error bars on the bins of a sampled Gaussian histogram
    Poisson(#[clap(flatten)] PoissonArg),
    /// Toy study of an infection fatality rate
    Ifr(#[clap(flatten)] IfrArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args
        .mode
        .unwrap_or(Mode::Binomial(BinomialArg::default()))
    {
        Mode::Binomial(arg) => binomial::run(&arg)?,
        Mode::Poisson(arg) => poisson::run(&arg)?,
        Mode::Ifr(arg) => ifr::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parses_subcommands() {
        let args = CommandArgs::try_parse_from(["countci", "binomial", "--trials", "10"]).unwrap();
        assert!(matches!(args.mode, Some(Mode::Binomial(_))));

        let args = CommandArgs::try_parse_from([
            "countci",
            "ifr",
            "--model",
            "Gaussian",
            "--toys",
            "100",
            "--no-plot",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::Ifr(_))));

        let args = CommandArgs::try_parse_from(["countci"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_rejects_malformed_seed() {
        assert!(CommandArgs::try_parse_from(["countci", "poisson", "--seed", "xyz"]).is_err());
    }
}
