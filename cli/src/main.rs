use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::LevelFilter;
use nflpbp::{
    aggregate::{sort_league_summary, TeamStatsDf},
    ingest::{import_game, GameFeed},
    pbp::{PbpDf, PbpFilter},
    store::{MemoryPlayStore, PlayScope, PlayStore},
    GroupBy, Phase, Play, TeamAggregateRow,
};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single play description
    Classify {
        description: String,

        #[arg(long)]
        down: Option<u8>,

        #[arg(long)]
        distance: Option<u16>,

        #[arg(long)]
        yards: Option<i32>,
    },

    /// Import JSON game feeds and summarize them
    Import {
        #[arg(value_name = "FEED", required = true)]
        feeds: Vec<std::path::PathBuf>,

        #[command(flatten)]
        summary: SummaryArgs,
    },

    /// Summarize an nflverse play-by-play parquet file
    Summary {
        /// Defaults to data/pbp_{season}.parquet
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<std::path::PathBuf>,

        #[arg(short = 'g', long = "game")]
        game: Option<String>,

        #[arg(long = "weeks", num_args = 2, value_names = ["START", "END"])]
        weeks: Option<Vec<u8>>,

        /// Only count snaps nflverse tags as pass or run
        #[arg(long)]
        scrimmage: bool,

        /// SQL run against the `plays` table before classification
        #[arg(long)]
        sql: Option<String>,

        #[command(flatten)]
        summary: SummaryArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct SummaryArgs {
    #[arg(short = 's', long = "season")]
    season: Option<u16>,

    #[arg(short = 'w', long = "week")]
    week: Option<u8>,

    #[arg(short = 't', long = "team")]
    team: Option<String>,

    /// REG, POST or PRE
    #[arg(long)]
    phase: Option<String>,

    /// team, team-week or team-phase
    #[arg(long, default_value = "team")]
    group_by: String,

    #[arg(long)]
    json: bool,
}

impl SummaryArgs {
    fn group_by(&self) -> Result<GroupBy> {
        match self.group_by.parse() {
            Ok(group_by) => Ok(group_by),
            Err(_) => bail!("Unsupported grouping. Use: team, team-week, or team-phase"),
        }
    }

    fn phase(&self) -> Result<Option<Phase>> {
        match self.phase.as_deref().map(str::parse::<Phase>) {
            None => Ok(None),
            Some(Ok(phase)) => Ok(Some(phase)),
            Some(Err(_)) => bail!("Unsupported phase. Use: REG, POST, or PRE"),
        }
    }

    fn scope(&self) -> Result<PlayScope> {
        let mut scope = PlayScope::new();
        if let Some(season) = self.season {
            scope = scope.season(season);
        }
        if let Some(week) = self.week {
            scope = scope.week(week);
        }
        if let Some(phase) = self.phase()? {
            scope = scope.phase(phase);
        }
        if let Some(team) = &self.team {
            scope = scope.team(team);
        }
        Ok(scope)
    }

    fn filter(&self) -> Result<PbpFilter> {
        let mut filter = PbpFilter::new();
        if let Some(season) = self.season {
            filter = filter.season(season);
        }
        if let Some(week) = self.week {
            filter = filter.week(week);
        }
        if let Some(phase) = self.phase()? {
            filter = filter.phase(phase);
        }
        if let Some(team) = &self.team {
            filter = filter.team(team);
        }
        Ok(filter)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set the default level based on verbosity
    let default_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = ConfigBuilder::new().add_filter_allow_str("nflpbp").build();
    TermLogger::init(
        default_level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::trace!("Args {:#?}", args);

    match args.command {
        Command::Classify {
            description,
            down,
            distance,
            yards,
        } => {
            let play_type = nflpbp::classify_play_type(&description);
            let success = match nflpbp::compute_success(down, distance, yards) {
                Some(true) => "success",
                Some(false) => "failure",
                None => "unknown",
            };
            println!("{}\t{}", play_type, success);
        }
        Command::Import { feeds, summary } => {
            let mut store = MemoryPlayStore::new();
            for path in feeds {
                let feed = GameFeed::load(&path)?;
                import_game(&feed, &mut store);
            }
            let plays = store.query(&summary.scope()?);
            report(&plays, &summary)?;
        }
        Command::Summary {
            file,
            game,
            weeks,
            scrimmage,
            sql,
            summary,
        } => {
            let mut pbp = match (file, summary.season) {
                (Some(file), _) => PbpDf::load_file(file)?,
                (None, Some(season)) => PbpDf::load(season)?,
                (None, None) => {
                    bail!("Pass --file, or --season to load data/pbp_{{season}}.parquet")
                }
            };
            if let Some(query) = sql {
                pbp = pbp.filter_sql(&query)?;
            }
            let mut filter = summary.filter()?;
            if let Some(game) = &game {
                filter = filter.game(game);
            }
            if let Some(weeks) = weeks {
                filter = filter.week_range(weeks[0], weeks[1]);
            }
            if scrimmage {
                filter = filter.scrimmage();
            }
            let pbp = pbp.filter(filter.build())?;
            log::info!("{} plays in scope", pbp.height());
            report(&pbp.plays()?, &summary)?;
        }
    }

    Ok(())
}

fn report(plays: &[Play], summary: &SummaryArgs) -> Result<()> {
    let mut rows: Vec<TeamAggregateRow> = nflpbp::aggregate(plays, summary.group_by()?);
    sort_league_summary(&mut rows);

    if summary.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let df = TeamStatsDf::from_rows(&rows)?;
        println!("{}", *df);
    }
    Ok(())
}
