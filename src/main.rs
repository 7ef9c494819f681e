use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::fmt::Debug;
use std::path::PathBuf;

use turismo::config::Config;
use turismo::geo;
use turismo::repository::{EntrepreneurQuery, MunicipalityQuery, PlanQuery, ServiceQuery};
use turismo::state::StateSlot;
use turismo::{logging, AppContext, Resource};

#[derive(Parser, Debug)]
#[command(name = "turismo")]
#[command(about = "Command line client for the turismo marketplace")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/turismo/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Log in; the password is read from TURISMO_PASSWORD
  Login { username: String },
  Logout,
  /// Show the persisted session
  Whoami,
  #[command(subcommand)]
  Municipalities(MunicipalityCommand),
  #[command(subcommand)]
  Entrepreneurs(EntrepreneurCommand),
  #[command(subcommand)]
  Services(ServiceCommand),
  #[command(subcommand)]
  Plans(PlanCommand),
  /// Show the shopping cart
  Cart,
  /// List my reservations
  Reservations,
  /// List my conversations
  Conversations,
  /// Great-circle distance between two points
  Distance {
    #[arg(allow_negative_numbers = true)]
    from_lat: f64,
    #[arg(allow_negative_numbers = true)]
    from_lon: f64,
    #[arg(allow_negative_numbers = true)]
    to_lat: f64,
    #[arg(allow_negative_numbers = true)]
    to_lon: f64,
  },
}

#[derive(Subcommand, Debug)]
enum MunicipalityCommand {
  List {
    #[arg(long, conflicts_with_all = ["province", "district"])]
    department: Option<String>,
    #[arg(long, conflicts_with = "district")]
    province: Option<String>,
    #[arg(long)]
    district: Option<String>,
  },
  Show { id: i64 },
  Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum EntrepreneurCommand {
  List {
    #[arg(long, conflicts_with = "sector")]
    municipality: Option<i64>,
    #[arg(long)]
    sector: Option<String>,
  },
  Show { id: i64 },
  Nearby {
    #[arg(allow_negative_numbers = true)]
    latitude: f64,
    #[arg(allow_negative_numbers = true)]
    longitude: f64,
    #[arg(long, default_value_t = turismo::repository::DEFAULT_RADIUS_KM)]
    radius: f64,
  },
}

#[derive(Subcommand, Debug)]
enum ServiceCommand {
  List {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, conflicts_with = "search")]
    entrepreneur: Option<i64>,
  },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
  List {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, conflicts_with = "search")]
    popular: bool,
  },
}

/// Print every state the slot publishes until it settles.
async fn follow<T: Clone + Debug + Send + Sync + 'static>(slot: &StateSlot<T>) -> Result<()> {
  let mut rx = slot.subscribe();
  loop {
    let state = rx.borrow_and_update().clone();
    match state {
      None => return Ok(()),
      Some(Resource::Loading) => println!("Cargando..."),
      Some(Resource::Success(data)) => {
        println!("{:#?}", data);
        return Ok(());
      }
      Some(Resource::Error(message)) => return Err(eyre!(message)),
    }
    rx.changed().await?;
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;
  let _guard = logging::init(&config.log)?;
  let ctx = AppContext::new(&config)?;

  match args.command {
    Command::Login { username } => {
      let password = Config::get_password()?;
      let vm = ctx.auth_view_model();
      vm.login(&username, &password);
      follow(&vm.login).await?;
    }
    Command::Logout => {
      let vm = ctx.auth_view_model();
      vm.logout();
      follow(&vm.logout).await?;
    }
    Command::Whoami => match ctx.session().current() {
      Some(session) => println!(
        "{} ({})",
        session.username.as_deref().unwrap_or("token sin usuario"),
        session.roles.join(", ")
      ),
      None => println!("No hay una sesión activa"),
    },
    Command::Municipalities(command) => {
      let vm = ctx.municipality_view_model();
      match command {
        MunicipalityCommand::List {
          department,
          province,
          district,
        } => {
          let query = match (department, province, district) {
            (Some(d), _, _) => MunicipalityQuery::Department(d),
            (_, Some(p), _) => MunicipalityQuery::Province(p),
            (_, _, Some(d)) => MunicipalityQuery::District(d),
            _ => MunicipalityQuery::All,
          };
          vm.load(query);
          follow(&vm.list).await?;
        }
        MunicipalityCommand::Show { id } => {
          vm.load_by_id(id);
          follow(&vm.detail).await?;
        }
        MunicipalityCommand::Delete { id } => {
          vm.delete(id);
          follow(&vm.delete).await?;
          follow(&vm.list).await?;
        }
      }
    }
    Command::Entrepreneurs(command) => {
      let vm = ctx.entrepreneur_view_model();
      match command {
        EntrepreneurCommand::List {
          municipality,
          sector,
        } => {
          let query = match (municipality, sector) {
            (Some(id), _) => EntrepreneurQuery::Municipality(id),
            (_, Some(s)) => EntrepreneurQuery::Sector(s),
            _ => EntrepreneurQuery::All,
          };
          vm.load(query);
          follow(&vm.list).await?;
        }
        EntrepreneurCommand::Show { id } => {
          vm.load_by_id(id);
          follow(&vm.detail).await?;
        }
        EntrepreneurCommand::Nearby {
          latitude,
          longitude,
          radius,
        } => {
          vm.load_nearby(latitude, longitude, radius);
          follow(&vm.list).await?;
        }
      }
    }
    Command::Services(ServiceCommand::List {
      search,
      entrepreneur,
    }) => {
      let vm = ctx.service_view_model();
      let query = match (search, entrepreneur) {
        (Some(term), _) => ServiceQuery::Search(term),
        (_, Some(id)) => ServiceQuery::Entrepreneur(id),
        _ => ServiceQuery::All,
      };
      vm.load(query);
      follow(&vm.list).await?;
    }
    Command::Plans(PlanCommand::List { search, popular }) => {
      let vm = ctx.plan_view_model();
      let query = match search {
        Some(term) => PlanQuery::Search(term),
        None if popular => PlanQuery::Popular,
        None => PlanQuery::All,
      };
      vm.load(query);
      follow(&vm.list).await?;
    }
    Command::Cart => {
      let vm = ctx.cart_view_model();
      vm.load();
      follow(&vm.cart).await?;
    }
    Command::Reservations => {
      let vm = ctx.cart_reservation_view_model();
      vm.load_mine();
      follow(&vm.mine).await?;
    }
    Command::Conversations => {
      let vm = ctx.chat_view_model();
      vm.load_conversations();
      follow(&vm.conversations).await?;
    }
    Command::Distance {
      from_lat,
      from_lon,
      to_lat,
      to_lon,
    } => {
      if !geo::is_valid_coordinate(from_lat, from_lon) || !geo::is_valid_coordinate(to_lat, to_lon) {
        return Err(eyre!("Coordenadas inválidas"));
      }
      let km = geo::distance_km(from_lat, from_lon, to_lat, to_lon);
      println!(
        "{:.3} km: {}",
        km,
        geo::relative_location(from_lat, from_lon, to_lat, to_lon)
      );
    }
  }

  Ok(())
}
