//! The neighbour-list orchestrator.
//!
//! [`NeighbourList`] owns the current [`Generation`], the contact graph
//! derived from it, and the face set derived from that. Every full build
//! replaces all three; nothing is patched in place.

use std::sync::Arc;

use kith_core::{DVec3, GenerationId, ParticleId, ParticleSystem};
use tracing::{debug, info, info_span, warn};

use crate::config::{ConfigError, NeighbourListConfig, ResolvedConfig};
use crate::contacts::{ContactGraph, ContactRule};
use crate::faces::{extract_faces, Face, FaceError, FaceStatus};
use crate::generation::{Adjacency, Generation};
use crate::staleness;
use crate::strategy::{AllPairsSearch, BuildStrategy, CellSearch, NeighbourSearch, SearchOutput};

/// Verlet neighbour list with optional contact graph and planar faces.
///
/// # Adjacency convention
///
/// Each neighbour pair `{i, j}` is stored once, in the list of the smaller
/// index. [`neighbours(i)`](Self::neighbours) therefore returns only
/// partners with index greater than `i`; pair kernels apply the
/// interaction to both particles. Use
/// [`Generation::contains_pair`] for order-independent lookups.
///
/// # Rebuild barrier
///
/// [`build`](Self::build) takes `&mut self`, so no borrowed neighbour
/// slice can outlive a rebuild. Readers that need a generation beyond a
/// rebuild clone the [`Arc`] from [`generation`](Self::generation).
///
/// # Examples
///
/// ```
/// use kith_core::{DVec3, Particle, ParticleId, ParticleStore, PeriodicBox};
/// use kith_nlist::{NeighbourList, NeighbourListConfig};
///
/// let bx = PeriodicBox::new(DVec3::splat(10.0)).unwrap();
/// let mut store = ParticleStore::new(bx);
/// store.push(Particle::new(DVec3::new(0.1, 5.0, 5.0), 0.5)).unwrap();
/// store.push(Particle::new(DVec3::new(9.9, 5.0, 5.0), 0.5)).unwrap();
///
/// let config = NeighbourListConfig::new(1.0).with_pad(0.2);
/// let nlist = NeighbourList::new(&config, &store).unwrap();
/// // 0.2 apart through the periodic boundary.
/// assert_eq!(nlist.neighbours(ParticleId(0)), &[ParticleId(1)]);
/// assert!(!nlist.needs_rebuild(&store));
/// ```
#[derive(Debug)]
pub struct NeighbourList {
    resolved: ResolvedConfig,
    cell_search: CellSearch,
    all_pairs: AllPairsSearch,
    generation: Arc<Generation>,
    next_id: GenerationId,
    contacts: Option<ContactGraph>,
    faces: Vec<Face>,
    face_status: FaceStatus,
}

impl NeighbourList {
    /// Validate `config` and perform the first full build.
    ///
    /// Fails with [`ConfigError`] when the configuration is incomplete or
    /// out of range; no partially configured list is ever returned.
    pub fn new(config: &NeighbourListConfig, system: &dyn ParticleSystem) -> Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        info!(config = %resolved.record(), "neighbour list configured");
        if resolved.build_contacts() && resolved.contact_rule() == ContactRule::RadiusSum {
            warn!("no contact distance set, using the sum of particle radii per pair");
        }

        let empty = Generation::new(
            GenerationId(0),
            BuildStrategy::AllPairs,
            resolved.search_radius(),
            *system.periodic_box(),
            Adjacency::with_capacity(0),
            Vec::new(),
        );
        let mut list = Self {
            resolved,
            cell_search: CellSearch::new(),
            all_pairs: AllPairsSearch,
            generation: Arc::new(empty),
            next_id: GenerationId(1),
            contacts: None,
            faces: Vec::new(),
            face_status: FaceStatus::NotBuilt,
        };
        list.build(system);
        Ok(list)
    }

    // ── Build ───────────────────────────────────────────────────

    /// Rebuild adjacency and snapshot from scratch, then contacts and
    /// faces if enabled. Returns the new generation's ID.
    ///
    /// Strategy selection happens here on every call: cell lists when
    /// permitted and every periodic box length exceeds twice the search
    /// radius, all-pairs otherwise.
    pub fn build(&mut self, system: &dyn ParticleSystem) -> GenerationId {
        let id = self.next_id;
        let span = info_span!("nlist_build", generation = %id);
        let _enter = span.enter();

        let positions: Vec<_> = (0..system.particle_count())
            .map(|i| system.position(ParticleId(i as u32)))
            .collect();
        let radius = self.resolved.search_radius();
        let (strategy, output) = self.search(system, &positions, radius);

        let previous = self.generation.strategy();
        if self.generation.id() == GenerationId(0) || previous != strategy {
            info!(%strategy, search_radius = radius, "neighbour search strategy selected");
        }
        debug!(
            %strategy,
            particles = positions.len(),
            pairs = output.adjacency.pair_count(),
            distance_checks = output.distance_checks,
            "neighbour list rebuilt"
        );

        self.generation = Arc::new(Generation::new(
            id,
            strategy,
            radius,
            *system.periodic_box(),
            output.adjacency,
            positions,
        ));
        self.next_id = id.next();
        self.contacts = None;
        self.faces.clear();
        self.face_status = FaceStatus::NotBuilt;

        if self.resolved.build_contacts() {
            self.build_contacts(system);
        }
        if self.resolved.build_faces() {
            if let Err(err) = self.build_faces(system) {
                debug!(%err, "generation has no faces");
            }
        }
        id
    }

    fn search(
        &mut self,
        system: &dyn ParticleSystem,
        positions: &[DVec3],
        radius: f64,
    ) -> (BuildStrategy, SearchOutput) {
        if self.resolved.allow_cell_list() {
            match self.cell_search.search(system, positions, radius) {
                Ok(output) => return (BuildStrategy::CellList, output),
                Err(err) => {
                    if self.generation.strategy() == BuildStrategy::CellList
                        || self.generation.id() == GenerationId(0)
                    {
                        info!(%err, "cell list unavailable, falling back to all-pairs search");
                    }
                }
            }
        }
        (BuildStrategy::AllPairs, self.all_pairs.run(system, positions, radius))
    }

    /// Multiply the cutoff by `factor` and rebuild.
    ///
    /// The strategy is re-evaluated for the new search radius. Fails
    /// without changing anything if `factor` is not finite and positive,
    /// or if a fixed contact distance would exceed the new search radius.
    pub fn rescale_cutoff(&mut self, factor: f64, system: &dyn ParticleSystem) -> Result<GenerationId, ConfigError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "factor",
                value: factor,
                reason: "must be finite and positive",
            });
        }
        let cutoff = self.resolved.cutoff() * factor;
        let search = cutoff + self.resolved.pad();
        if let ContactRule::Fixed(contact) = self.resolved.contact_rule() {
            if contact > search {
                return Err(ConfigError::ContactExceedsSearch { contact, search });
            }
        }
        info!(old = self.resolved.cutoff(), new = cutoff, "cutoff rescaled");
        self.resolved.set_cutoff(cutoff);
        Ok(self.build(system))
    }

    // ── Staleness ───────────────────────────────────────────────

    /// Whether `id` has moved more than `pad / 2` since the last build.
    ///
    /// A particle outside the last snapshot is always stale.
    pub fn need_update(&self, system: &dyn ParticleSystem, id: ParticleId) -> bool {
        staleness::is_stale(&self.generation, system, id, self.resolved.pad())
    }

    /// Whether any particle is stale or the particle count changed.
    pub fn needs_rebuild(&self, system: &dyn ParticleSystem) -> bool {
        staleness::any_stale(&self.generation, system, self.resolved.pad())
    }

    /// Rebuild if [`needs_rebuild`](Self::needs_rebuild). Returns whether a
    /// rebuild happened.
    pub fn update(&mut self, system: &dyn ParticleSystem) -> bool {
        if self.needs_rebuild(system) {
            self.build(system);
            true
        } else {
            false
        }
    }

    /// Largest minimum-image displacement since the last build.
    pub fn max_displacement(&self, system: &dyn ParticleSystem) -> f64 {
        staleness::max_displacement(&self.generation, system)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Partners of `id` with larger index, ascending.
    pub fn neighbours(&self, id: ParticleId) -> &[ParticleId] {
        self.generation.neighbours(id)
    }

    /// Interaction cutoff (excluding the pad).
    pub fn cutoff(&self) -> f64 {
        self.resolved.cutoff()
    }

    /// Verlet skin.
    pub fn pad(&self) -> f64 {
        self.resolved.pad()
    }

    /// `cutoff + pad`.
    pub fn search_radius(&self) -> f64 {
        self.resolved.search_radius()
    }

    /// Strategy used by the current generation.
    pub fn strategy(&self) -> BuildStrategy {
        self.generation.strategy()
    }

    /// The current generation.
    pub fn generation(&self) -> Arc<Generation> {
        Arc::clone(&self.generation)
    }

    /// The resolved configuration and its provenance record.
    pub fn resolved(&self) -> &ResolvedConfig {
        &self.resolved
    }

    // ── Contacts ────────────────────────────────────────────────

    /// Derive the contact graph from the current generation.
    ///
    /// Calling this again without an intervening build yields the same
    /// graph for unchanged positions.
    pub fn build_contacts(&mut self, system: &dyn ParticleSystem) -> &ContactGraph {
        let contacts = self.derive_contacts(system);
        self.contacts.insert(contacts)
    }

    fn derive_contacts(&self, system: &dyn ParticleSystem) -> ContactGraph {
        let contacts = ContactGraph::build(&self.generation, system, self.resolved.contact_rule());
        debug!(
            generation = %contacts.generation(),
            contacts = contacts.edge_count(),
            "contact graph built"
        );
        contacts
    }

    /// The contact graph, if one was built for the current generation.
    pub fn contacts(&self) -> Option<&ContactGraph> {
        self.contacts.as_ref()
    }

    // ── Faces ───────────────────────────────────────────────────

    /// Extract planar faces of the contact graph, building the graph first
    /// if it is missing or belongs to an older generation.
    ///
    /// A non-planar contact graph is not fatal: the face set is emptied,
    /// a warning is logged, and the error is returned and kept in
    /// [`face_status`](Self::face_status).
    pub fn build_faces(&mut self, system: &dyn ParticleSystem) -> Result<usize, FaceError> {
        let current = self.generation.id();
        let contacts = match self.contacts.take() {
            Some(contacts) if contacts.generation() == current => contacts,
            _ => self.derive_contacts(system),
        };
        let extracted = extract_faces(&contacts, system);
        self.contacts = Some(contacts);

        match extracted {
            Ok((faces, skipped)) => {
                debug!(faces = faces.len(), skipped, "faces extracted");
                let count = faces.len();
                self.faces = faces;
                self.face_status = FaceStatus::Ready { faces: count };
                Ok(count)
            }
            Err(err) => {
                warn!(%err, "face extraction failed, face set left empty");
                self.faces.clear();
                self.face_status = FaceStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Whether the latest face extraction succeeded.
    pub fn has_faces(&self) -> bool {
        matches!(self.face_status, FaceStatus::Ready { .. })
    }

    /// Faces from the latest successful extraction; empty otherwise.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Outcome of the latest face extraction.
    pub fn face_status(&self) -> &FaceStatus {
        &self.face_status
    }
}
