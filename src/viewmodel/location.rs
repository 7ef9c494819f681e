use crate::models::{
  CoordinateValidation, Distance, EntrepreneurLocation, LocationRequest, LocationUpdate,
  NearbyKind, NearbyResults, ServiceLocation,
};
use crate::repository::LocationRepository;
use crate::state::StateSlot;

#[derive(Clone)]
pub struct LocationViewModel {
  repo: LocationRepository,
  pub entrepreneurs: StateSlot<Vec<EntrepreneurLocation>>,
  pub services: StateSlot<Vec<ServiceLocation>>,
  pub nearby: StateSlot<NearbyResults>,
  pub distance: StateSlot<Distance>,
  pub validation: StateSlot<CoordinateValidation>,
  pub update: StateSlot<LocationUpdate>,
}

impl LocationViewModel {
  pub fn new(repo: LocationRepository) -> Self {
    Self {
      repo,
      entrepreneurs: StateSlot::new(),
      services: StateSlot::new(),
      nearby: StateSlot::new(),
      distance: StateSlot::new(),
      validation: StateSlot::new(),
      update: StateSlot::new(),
    }
  }

  pub fn load_entrepreneurs(&self) {
    self.entrepreneurs.launch(self.repo.entrepreneurs());
  }

  pub fn load_services(&self) {
    self.services.launch(self.repo.services());
  }

  pub fn search_nearby(
    &self,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    kind: Option<NearbyKind>,
  ) {
    self
      .nearby
      .launch(self.repo.nearby(latitude, longitude, radius_km, kind));
  }

  pub fn measure(&self, from: (f64, f64), to: (f64, f64)) {
    self.distance.launch(self.repo.distance(from, to));
  }

  pub fn validate(&self, latitude: f64, longitude: f64) {
    self.validation.launch(self.repo.validate(latitude, longitude));
  }

  pub fn update_entrepreneur_location(&self, entrepreneur_id: i64, request: LocationRequest) {
    let vm = self.clone();
    self.update.launch_then(
      self.repo.update_entrepreneur_location(entrepreneur_id, request),
      move |_| {
        if vm.entrepreneurs.get().is_some() {
          vm.load_entrepreneurs();
        }
      },
    );
  }

  pub fn update_service_location(&self, service_id: i64, request: LocationRequest) {
    let vm = self.clone();
    self.update.launch_then(
      self.repo.update_service_location(service_id, request),
      move |_| {
        if vm.services.get().is_some() {
          vm.load_services();
        }
      },
    );
  }

  pub fn clear_operations(&self) {
    self.update.clear();
  }
}
