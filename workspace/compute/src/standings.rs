//! Read views: league tables, league listings and rosters.

use common::{LeagueDto, LeagueMemberDto, RosterDto, StandingDto};
use model::entities::{league, player, roster};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::error::{LeagueError, Result};

/// Every league with its owner and members, ordered by name.
#[instrument(skip(db))]
pub async fn list_leagues(db: &DatabaseConnection) -> Result<Vec<LeagueDto>> {
    let leagues = league::Entity::find()
        .order_by_asc(league::Column::Name)
        .order_by_asc(league::Column::Id)
        .all(db)
        .await?;
    let players: HashMap<i32, player::Model> = player::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let rosters = roster::Entity::find()
        .order_by_asc(roster::Column::Id)
        .all(db)
        .await?;

    let mut members: HashMap<i32, Vec<LeagueMemberDto>> = HashMap::new();
    for roster in rosters {
        let player_name = players
            .get(&roster.player_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        members.entry(roster.league_id).or_default().push(LeagueMemberDto {
            player_id: roster.player_id,
            player_name,
            roster_id: roster.id,
        });
    }

    let result: Vec<LeagueDto> = leagues
        .into_iter()
        .map(|league| LeagueDto {
            owner_name: league
                .owner_id
                .and_then(|id| players.get(&id))
                .map(|p| p.name.clone()),
            members: members.remove(&league.id).unwrap_or_default(),
            id: league.id,
            name: league.name,
            player_count: league.player_count,
            owner_id: league.owner_id,
        })
        .collect();
    debug!("Listed {} leagues", result.len());
    Ok(result)
}

/// One league with its owner and members.
#[instrument(skip(db))]
pub async fn get_league(db: &DatabaseConnection, league_id: i32) -> Result<LeagueDto> {
    let league = league::Entity::find_by_id(league_id)
        .one(db)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("League {} not found", league_id)))?;

    let owner_name = match league.owner_id {
        Some(owner_id) => player::Entity::find_by_id(owner_id)
            .one(db)
            .await?
            .map(|p| p.name),
        None => None,
    };

    let members = roster::Entity::find()
        .find_also_related(player::Entity)
        .filter(roster::Column::LeagueId.eq(league_id))
        .order_by_asc(roster::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|(roster, player)| LeagueMemberDto {
            player_id: roster.player_id,
            player_name: player.map(|p| p.name).unwrap_or_default(),
            roster_id: roster.id,
        })
        .collect();

    Ok(LeagueDto {
        id: league.id,
        name: league.name,
        player_count: league.player_count,
        owner_id: league.owner_id,
        owner_name,
        members,
    })
}

/// Rosters of a league ranked by points, highest first. Ties are ordered by player name.
#[instrument(skip(db))]
pub async fn league_standings(db: &DatabaseConnection, league_id: i32) -> Result<Vec<StandingDto>> {
    if league::Entity::find_by_id(league_id).one(db).await?.is_none() {
        return Err(LeagueError::not_found(format!("League {} not found", league_id)));
    }

    let mut rows: Vec<(roster::Model, player::Model)> = roster::Entity::find()
        .find_also_related(player::Entity)
        .filter(roster::Column::LeagueId.eq(league_id))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(roster, player)| player.map(|p| (roster, p)))
        .collect();
    rows.sort_by(|(ra, pa), (rb, pb)| {
        rb.points
            .cmp(&ra.points)
            .then_with(|| pa.name.cmp(&pb.name))
            .then_with(|| ra.id.cmp(&rb.id))
    });

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, (roster, player))| StandingDto {
            rank: index + 1,
            player_id: player.id,
            player_name: player.name,
            roster_id: roster.id,
            roster_name: roster.name,
            points: roster.points,
        })
        .collect())
}

/// All rosters of a player with the name of their league.
#[instrument(skip(db))]
pub async fn player_rosters(db: &DatabaseConnection, player_id: i32) -> Result<Vec<RosterDto>> {
    if player::Entity::find_by_id(player_id).one(db).await?.is_none() {
        return Err(LeagueError::not_found(format!("Player {} not found", player_id)));
    }

    let rows = roster::Entity::find()
        .find_also_related(league::Entity)
        .filter(roster::Column::PlayerId.eq(player_id))
        .order_by_asc(roster::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(roster, league)| roster_dto(roster, league))
        .collect())
}

/// One roster with the name of its league.
pub async fn get_roster(db: &DatabaseConnection, roster_id: i32) -> Result<RosterDto> {
    let (roster, league) = roster::Entity::find_by_id(roster_id)
        .find_also_related(league::Entity)
        .one(db)
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("Roster {} not found", roster_id)))?;
    Ok(roster_dto(roster, league))
}

fn roster_dto(roster: roster::Model, league: Option<league::Model>) -> RosterDto {
    RosterDto {
        id: roster.id,
        name: roster.name,
        player_id: roster.player_id,
        league_id: roster.league_id,
        league_name: league.map(|l| l.name).unwrap_or_default(),
        budget: roster.budget,
        points: roster.points,
    }
}
