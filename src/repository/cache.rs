//! Cache tables for municipalities and entrepreneurs.

use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::cache::{cached_at_column, CacheQuery, Cacheable, CachedEntity};
use crate::geo;
use crate::models::{CategoryBasic, Entrepreneur, Municipality, MunicipalityBasic};

// ============================================================================
// Query types
// ============================================================================

/// Logical municipality list queries, mirroring the remote list endpoints.
#[derive(Clone, Debug, PartialEq)]
pub enum MunicipalityQuery {
  All,
  Department(String),
  Province(String),
  District(String),
  /// The municipality managed by a user
  OwnedBy(i64),
}

impl CacheQuery for MunicipalityQuery {
  fn is_full_list(&self) -> bool {
    matches!(self, Self::All)
  }

  fn description(&self) -> String {
    match self {
      Self::All => "all municipalities".to_string(),
      Self::Department(d) => format!("municipalities in department {}", d),
      Self::Province(p) => format!("municipalities in province {}", p),
      Self::District(d) => format!("municipalities in district {}", d),
      Self::OwnedBy(user) => format!("municipality of user {}", user),
    }
  }
}

impl MunicipalityQuery {
  fn filter(&self) -> (&'static str, Option<Value>) {
    match self {
      Self::All => ("", None),
      Self::Department(d) => (
        " WHERE department = ?1 COLLATE NOCASE",
        Some(Value::Text(d.clone())),
      ),
      Self::Province(p) => (
        " WHERE province = ?1 COLLATE NOCASE",
        Some(Value::Text(p.clone())),
      ),
      Self::District(d) => (
        " WHERE district = ?1 COLLATE NOCASE",
        Some(Value::Text(d.clone())),
      ),
      Self::OwnedBy(user) => (" WHERE user_id = ?1", Some(Value::Integer(*user))),
    }
  }
}

/// Logical entrepreneur list queries.
#[derive(Clone, Debug, PartialEq)]
pub enum EntrepreneurQuery {
  All,
  Municipality(i64),
  Sector(String),
  Category(i64),
  OwnedBy(i64),
  /// Entrepreneurs with coordinates within `radius_km` of a point,
  /// closest first
  Nearby {
    latitude: f64,
    longitude: f64,
    radius_km: f64,
  },
}

impl CacheQuery for EntrepreneurQuery {
  fn is_full_list(&self) -> bool {
    matches!(self, Self::All)
  }

  fn description(&self) -> String {
    match self {
      Self::All => "all entrepreneurs".to_string(),
      Self::Municipality(id) => format!("entrepreneurs of municipality {}", id),
      Self::Sector(s) => format!("entrepreneurs in sector {}", s),
      Self::Category(id) => format!("entrepreneurs in category {}", id),
      Self::OwnedBy(user) => format!("entrepreneur of user {}", user),
      Self::Nearby {
        latitude,
        longitude,
        radius_km,
      } => format!(
        "entrepreneurs within {} km of ({}, {})",
        radius_km, latitude, longitude
      ),
    }
  }
}

impl EntrepreneurQuery {
  fn filter(&self) -> (&'static str, Option<Value>) {
    match self {
      Self::All => ("", None),
      Self::Municipality(id) => (" WHERE e.municipality_id = ?1", Some(Value::Integer(*id))),
      Self::Sector(s) => (
        " WHERE e.sector = ?1 COLLATE NOCASE",
        Some(Value::Text(s.clone())),
      ),
      Self::Category(id) => (" WHERE e.category_id = ?1", Some(Value::Integer(*id))),
      Self::OwnedBy(user) => (" WHERE e.user_id = ?1", Some(Value::Integer(*user))),
      Self::Nearby { .. } => (
        " WHERE e.latitude IS NOT NULL AND e.longitude IS NOT NULL",
        None,
      ),
    }
  }
}

// ============================================================================
// Cacheable implementations
// ============================================================================

const MUNICIPALITY_COLUMNS: &str = "id, name, department, province, district, address, \
   phone, website, description, user_id, entrepreneurs, cached_at";

fn municipality_from_row(row: &Row<'_>) -> rusqlite::Result<CachedEntity<Municipality>> {
  let entrepreneurs: String = row.get(10)?;
  let entrepreneurs = serde_json::from_str(&entrepreneurs)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

  Ok(CachedEntity {
    entity: Municipality {
      id: row.get(0)?,
      name: row.get(1)?,
      department: row.get(2)?,
      province: row.get(3)?,
      district: row.get(4)?,
      address: row.get(5)?,
      phone: row.get(6)?,
      website: row.get(7)?,
      description: row.get(8)?,
      user_id: row.get(9)?,
      entrepreneurs,
    },
    cached_at: cached_at_column(row, 11)?,
  })
}

impl Cacheable for Municipality {
  type Query = MunicipalityQuery;

  fn entity_type() -> &'static str {
    "municipalities"
  }

  fn cache_id(&self) -> i64 {
    self.id
  }

  fn upsert_row(conn: &Connection, m: &Self) -> rusqlite::Result<()> {
    let entrepreneurs = serde_json::to_string(&m.entrepreneurs)
      .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    conn.execute(
      "INSERT OR REPLACE INTO municipalities
       (id, name, department, province, district, address, phone, website,
        description, user_id, entrepreneurs, cached_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, datetime('now'))",
      params![
        m.id,
        m.name,
        m.department,
        m.province,
        m.district,
        m.address,
        m.phone,
        m.website,
        m.description,
        m.user_id,
        entrepreneurs,
      ],
    )?;
    Ok(())
  }

  fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<CachedEntity<Self>>> {
    conn
      .query_row(
        &format!("SELECT {} FROM municipalities WHERE id = ?1", MUNICIPALITY_COLUMNS),
        params![id],
        municipality_from_row,
      )
      .optional()
  }

  fn select(conn: &Connection, query: &Self::Query) -> rusqlite::Result<Vec<CachedEntity<Self>>> {
    let (clause, value) = query.filter();
    let sql = format!(
      "SELECT {} FROM municipalities{} ORDER BY id",
      MUNICIPALITY_COLUMNS, clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(value), municipality_from_row)?;
    rows.collect()
  }
}

/// Entrepreneur columns plus the joined parent name and district.
/// A NULL `m.name` means the parent row is not cached.
const ENTREPRENEUR_SELECT: &str = "SELECT e.id, e.business_name, e.sector, e.address, \
   e.latitude, e.longitude, e.full_address, e.phone, e.email, e.website, e.description, \
   e.products, e.services, e.user_id, e.municipality_id, m.name, m.district, \
   e.category_id, e.category_name, e.cached_at \
   FROM entrepreneurs e LEFT JOIN municipalities m ON m.id = e.municipality_id";

fn entrepreneur_from_row(row: &Row<'_>) -> rusqlite::Result<CachedEntity<Entrepreneur>> {
  let municipality_id: Option<i64> = row.get(14)?;
  let municipality_name: Option<String> = row.get(15)?;
  let municipality = match (municipality_id, municipality_name) {
    (Some(id), Some(name)) => Some(MunicipalityBasic {
      id,
      name,
      district: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
    }),
    _ => None,
  };

  let category_id: Option<i64> = row.get(17)?;
  let category_name: Option<String> = row.get(18)?;
  let category = category_id.map(|id| CategoryBasic {
    id,
    name: category_name.unwrap_or_default(),
  });

  Ok(CachedEntity {
    entity: Entrepreneur {
      id: row.get(0)?,
      business_name: row.get(1)?,
      sector: row.get(2)?,
      address: row.get(3)?,
      latitude: row.get(4)?,
      longitude: row.get(5)?,
      full_address: row.get(6)?,
      phone: row.get(7)?,
      email: row.get(8)?,
      website: row.get(9)?,
      description: row.get(10)?,
      products: row.get(11)?,
      services: row.get(12)?,
      user_id: row.get(13)?,
      municipality,
      category,
    },
    cached_at: cached_at_column(row, 19)?,
  })
}

impl Cacheable for Entrepreneur {
  type Query = EntrepreneurQuery;

  fn entity_type() -> &'static str {
    "entrepreneurs"
  }

  fn cache_id(&self) -> i64 {
    self.id
  }

  fn upsert_row(conn: &Connection, e: &Self) -> rusqlite::Result<()> {
    if let Some(m) = &e.municipality {
      // Only the basic columns are known here; keep anything richer
      conn.execute(
        "INSERT INTO municipalities (id, name, district) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, district = excluded.district",
        params![m.id, m.name, m.district],
      )?;
    }

    conn.execute(
      "INSERT OR REPLACE INTO entrepreneurs
       (id, business_name, sector, address, latitude, longitude, full_address, phone,
        email, website, description, products, services, user_id, municipality_id,
        category_id, category_name, cached_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
               ?16, ?17, datetime('now'))",
      params![
        e.id,
        e.business_name,
        e.sector,
        e.address,
        e.latitude,
        e.longitude,
        e.full_address,
        e.phone,
        e.email,
        e.website,
        e.description,
        e.products,
        e.services,
        e.user_id,
        e.municipality.as_ref().map(|m| m.id),
        e.category.as_ref().map(|c| c.id),
        e.category.as_ref().map(|c| c.name.as_str()),
      ],
    )?;
    Ok(())
  }

  fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<CachedEntity<Self>>> {
    conn
      .query_row(
        &format!("{} WHERE e.id = ?1", ENTREPRENEUR_SELECT),
        params![id],
        entrepreneur_from_row,
      )
      .optional()
  }

  fn select(conn: &Connection, query: &Self::Query) -> rusqlite::Result<Vec<CachedEntity<Self>>> {
    let (clause, value) = query.filter();
    let sql = format!("{}{} ORDER BY e.id", ENTREPRENEUR_SELECT, clause);
    let mut stmt = conn.prepare(&sql)?;
    let rows: Vec<_> = stmt
      .query_map(params_from_iter(value), entrepreneur_from_row)?
      .collect::<rusqlite::Result<_>>()?;

    let EntrepreneurQuery::Nearby {
      latitude,
      longitude,
      radius_km,
    } = *query
    else {
      return Ok(rows);
    };

    let mut nearby: Vec<(f64, CachedEntity<Self>)> = rows
      .into_iter()
      .filter_map(|row| {
        let (lat, lon) = row.entity.coordinates()?;
        let distance = geo::distance_km(latitude, longitude, lat, lon);
        (distance <= radius_km).then_some((distance, row))
      })
      .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(nearby.into_iter().map(|(_, row)| row).collect())
  }
}

/// Move a cached entrepreneur to new coordinates. Returns whether the row
/// was cached.
pub(crate) fn relocate_entrepreneur(
  conn: &Connection,
  id: i64,
  latitude: f64,
  longitude: f64,
  full_address: Option<&str>,
) -> rusqlite::Result<bool> {
  let updated = conn.execute(
    "UPDATE entrepreneurs
     SET latitude = ?2, longitude = ?3, full_address = COALESCE(?4, full_address),
         cached_at = datetime('now')
     WHERE id = ?1",
    params![id, latitude, longitude, full_address],
  )?;
  Ok(updated > 0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheStorage, SqliteStorage};
  use crate::models::EntrepreneurBasic;

  fn municipality(id: i64, name: &str) -> Municipality {
    Municipality {
      id,
      name: name.to_string(),
      department: "Puno".to_string(),
      province: "Puno".to_string(),
      district: name.to_string(),
      address: Some("Plaza de Armas s/n".to_string()),
      phone: None,
      website: None,
      description: None,
      user_id: 7,
      entrepreneurs: vec![EntrepreneurBasic {
        id: 3,
        business_name: "Casa Lago".to_string(),
        sector: "Hospedaje".to_string(),
      }],
    }
  }

  fn entrepreneur(id: i64, municipality_id: i64, coords: Option<(f64, f64)>) -> Entrepreneur {
    Entrepreneur {
      id,
      business_name: format!("Emprendimiento {}", id),
      sector: "Gastronomía".to_string(),
      address: None,
      latitude: coords.map(|c| c.0),
      longitude: coords.map(|c| c.1),
      full_address: None,
      phone: Some("951000000".to_string()),
      email: None,
      website: None,
      description: None,
      products: None,
      services: None,
      user_id: 20 + id,
      municipality: Some(MunicipalityBasic {
        id: municipality_id,
        name: "Capachica".to_string(),
        district: "Capachica".to_string(),
      }),
      category: Some(CategoryBasic {
        id: 2,
        name: "Comida".to_string(),
      }),
    }
  }

  #[test]
  fn upsert_same_id_keeps_one_row_with_latest_values() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.upsert(&[municipality(1, "Puno")]).unwrap();

    let updated = Municipality {
      phone: Some("051-123456".to_string()),
      ..municipality(1, "Puno Ciudad")
    };
    storage.upsert(&[updated.clone()]).unwrap();

    let all = storage.query::<Municipality>(&MunicipalityQuery::All).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].entity, updated);
    assert_eq!(
      storage.get::<Municipality>(1).unwrap().unwrap().entity,
      updated
    );
  }

  #[test]
  fn missing_parent_hydrates_as_none() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.upsert(&[entrepreneur(3, 5, None)]).unwrap();
    storage.remove::<Municipality>(5).unwrap();

    let cached = storage.get::<Entrepreneur>(3).unwrap().unwrap();
    assert!(cached.entity.municipality.is_none());
    assert_eq!(cached.entity.business_name, "Emprendimiento 3");

    let by_parent = storage
      .query::<Entrepreneur>(&EntrepreneurQuery::Municipality(5))
      .unwrap();
    assert_eq!(by_parent.len(), 1);
    assert!(by_parent[0].entity.municipality.is_none());
  }

  #[test]
  fn present_parent_hydrates_from_its_row() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.upsert(&[municipality(5, "Capachica")]).unwrap();
    storage.upsert(&[entrepreneur(3, 5, None)]).unwrap();

    let cached = storage.get::<Entrepreneur>(3).unwrap().unwrap();
    assert_eq!(
      cached.entity.municipality,
      Some(MunicipalityBasic {
        id: 5,
        name: "Capachica".to_string(),
        district: "Capachica".to_string(),
      })
    );
    assert_eq!(cached.entity.category.map(|c| c.name), Some("Comida".to_string()));
  }

  #[test]
  fn entrepreneur_upsert_keeps_richer_parent_columns() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.upsert(&[municipality(5, "Capachica")]).unwrap();
    storage.upsert(&[entrepreneur(3, 5, None)]).unwrap();

    let parent = storage.get::<Municipality>(5).unwrap().unwrap().entity;
    assert_eq!(parent.department, "Puno");
    assert_eq!(parent.address.as_deref(), Some("Plaza de Armas s/n"));
    assert_eq!(parent.entrepreneurs.len(), 1);
  }

  #[test]
  fn filtered_queries_use_columns() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let cusco = Municipality {
      department: "Cusco".to_string(),
      user_id: 9,
      ..municipality(2, "Pisac")
    };
    storage.upsert(&[municipality(1, "Puno"), cusco]).unwrap();

    let in_cusco = storage
      .query::<Municipality>(&MunicipalityQuery::Department("cusco".to_string()))
      .unwrap();
    assert_eq!(in_cusco.len(), 1);
    assert_eq!(in_cusco[0].entity.id, 2);

    let owned = storage
      .query::<Municipality>(&MunicipalityQuery::OwnedBy(7))
      .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].entity.id, 1);
  }

  #[test]
  fn nearby_filters_by_radius_closest_first() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage
      .upsert(&[
        // ~5.5 km north of the origin
        entrepreneur(1, 5, Some((-15.79, -69.99))),
        // at the origin
        entrepreneur(2, 5, Some((-15.84, -69.99))),
        // Cusco, far away
        entrepreneur(3, 5, Some((-13.53, -71.97))),
        entrepreneur(4, 5, None),
      ])
      .unwrap();

    let nearby = storage
      .query::<Entrepreneur>(&EntrepreneurQuery::Nearby {
        latitude: -15.84,
        longitude: -69.99,
        radius_km: 10.0,
      })
      .unwrap();
    let ids: Vec<i64> = nearby.iter().map(|r| r.entity.id).collect();
    assert_eq!(ids, vec![2, 1]);
  }

  #[test]
  fn relocation_keeps_the_dangling_parent_id() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.upsert(&[entrepreneur(3, 5, Some((-15.84, -69.99)))]).unwrap();
    storage.remove::<Municipality>(5).unwrap();

    let moved = storage
      .write(|conn| relocate_entrepreneur(conn, 3, -13.53, -71.97, Some("Av. Sol 120")))
      .unwrap();
    assert!(moved);

    let cached = storage.get::<Entrepreneur>(3).unwrap().unwrap().entity;
    assert_eq!(cached.coordinates(), Some((-13.53, -71.97)));
    assert_eq!(cached.full_address.as_deref(), Some("Av. Sol 120"));
    let by_parent = storage
      .query::<Entrepreneur>(&EntrepreneurQuery::Municipality(5))
      .unwrap();
    assert_eq!(by_parent.len(), 1);

    assert!(!storage
      .write(|conn| relocate_entrepreneur(conn, 99, 0.0, 0.0, None))
      .unwrap());
  }

  #[test]
  fn full_list_flag() {
    assert!(MunicipalityQuery::All.is_full_list());
    assert!(!MunicipalityQuery::District("Juli".to_string()).is_full_list());
    assert!(!EntrepreneurQuery::Sector("Hospedaje".to_string()).is_full_list());
  }
}
