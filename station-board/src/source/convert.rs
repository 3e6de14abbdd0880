//! Conversion from provider responses to domain types.

use tracing::warn;

use crate::domain::{
    Remark, ScheduleEntry, ScheduleError, Station, StationDetail, StationId, StopRef, StopTime,
    Trip,
};

use super::error::FetchError;
use super::wire::{RouteDto, StationDetailDto, StationDto, StopTimeDto, TripDto};

/// Parse a station list response body.
pub fn parse_station_list(body: &str) -> Result<Vec<Station>, FetchError> {
    let dtos: Vec<StationDto> =
        serde_json::from_str(body).map_err(|e| FetchError::malformed(e.to_string(), body))?;
    Ok(convert_station_list(dtos))
}

/// Parse a station detail response body.
///
/// An empty or `null` body means the provider has no such station.
pub fn parse_station_detail(id: &StationId, body: &str) -> Result<StationDetail, FetchError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(FetchError::NotFound { id: id.clone() });
    }

    let dto: StationDetailDto =
        serde_json::from_str(body).map_err(|e| FetchError::malformed(e.to_string(), body))?;
    Ok(convert_station_detail(dto))
}

/// Convert station list entries, dropping ones without an id.
pub fn convert_station_list(dtos: Vec<StationDto>) -> Vec<Station> {
    dtos.into_iter()
        .filter_map(|dto| {
            if dto.gtfs_id.is_empty() {
                warn!(name = %dto.name, "skipping station without id");
                return None;
            }
            Some(Station::new(dto.gtfs_id, dto.name))
        })
        .collect()
}

/// Convert a station detail response.
///
/// Routes that break the model's invariants (no trips, or a trip without
/// stop times) are skipped so one bad route does not blank the board.
pub fn convert_station_detail(dto: StationDetailDto) -> StationDetail {
    let mut routes = Vec::with_capacity(dto.routes.len());

    for route in dto.routes {
        match convert_route(route) {
            Ok(entry) => routes.push(entry),
            Err(e) => warn!(station = %dto.gtfs_id, error = %e, "skipping route"),
        }
    }

    StationDetail {
        id: StationId::new(dto.gtfs_id),
        name: dto.name,
        routes,
    }
}

/// Convert a single route to a schedule entry.
pub fn convert_route(dto: RouteDto) -> Result<ScheduleEntry, ScheduleError> {
    let trips = dto
        .trips
        .into_iter()
        .map(convert_trip)
        .collect::<Result<Vec<_>, _>>()?;

    let remarks = dto
        .remarks
        .unwrap_or_default()
        .into_iter()
        .map(|r| Remark {
            title: r.title,
            message: r.message,
        })
        .collect();

    ScheduleEntry::new(
        dto.short_name.unwrap_or_default(),
        dto.delay.unwrap_or(0),
        remarks,
        trips,
    )
}

fn convert_trip(dto: TripDto) -> Result<Trip, ScheduleError> {
    let stop_times = dto.stoptimes.into_iter().map(convert_stop_time).collect();
    Trip::new(dto.gtfs_id, stop_times)
}

fn convert_stop_time(dto: StopTimeDto) -> StopTime {
    StopTime {
        stop: StopRef {
            id: dto.stop.gtfs_id,
            name: dto.stop.name,
        },
        scheduled_arrival: dto.scheduled_arrival,
        scheduled_departure: dto.scheduled_departure,
        estimated_arrival: dto.estimated_time_arrival,
        estimated_departure: dto.estimated_time_departure,
    }
}
