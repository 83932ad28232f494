//! Resource services
//!
//! Each service is a thin, borrowed view over the shared [`Client`]. It is
//! created on demand by an accessor such as [`Client::droplets`]. Services
//! hold no state of their own.
//!
//! # Example
//!
//! ```ignore
//! use docean::api::{Client, ListOptions};
//! use docean::resource::fetch_all;
//!
//! async fn all_domains(client: &Client) -> docean::api::Result<Vec<String>> {
//!     let domains = fetch_all(ListOptions::new(1, 200), |opts| async move {
//!         client.domains().list(&opts).await
//!     })
//!     .await?;
//!     Ok(domains.into_iter().map(|d| d.name).collect())
//! }
//! ```

pub mod account;
pub mod actions;
pub mod byoip;
pub mod container_registry;
pub mod databases;
pub mod domains;
pub mod droplet_actions;
pub mod droplets;
mod fetcher;
pub mod functions;
pub mod genai;
pub mod images;
pub mod kubernetes;
pub mod load_balancers;
pub mod nat_gateways;
pub mod nfs;
pub mod one_clicks;
pub mod partner_connect;
pub mod regions;
pub mod security;
pub mod sizes;
pub mod snapshots;
pub mod spaces_keys;
pub mod uptime;
pub mod vpcs;

pub use fetcher::{fetch_all, pages};

use crate::api::Client;

impl Client {
    pub fn account(&self) -> account::AccountService<'_> {
        account::AccountService::new(self)
    }

    pub fn actions(&self) -> actions::ActionsService<'_> {
        actions::ActionsService::new(self)
    }

    pub fn regions(&self) -> regions::RegionsService<'_> {
        regions::RegionsService::new(self)
    }

    pub fn sizes(&self) -> sizes::SizesService<'_> {
        sizes::SizesService::new(self)
    }

    pub fn snapshots(&self) -> snapshots::SnapshotsService<'_> {
        snapshots::SnapshotsService::new(self)
    }

    pub fn images(&self) -> images::ImagesService<'_> {
        images::ImagesService::new(self)
    }

    pub fn droplets(&self) -> droplets::DropletsService<'_> {
        droplets::DropletsService::new(self)
    }

    pub fn droplet_actions(&self) -> droplet_actions::DropletActionsService<'_> {
        droplet_actions::DropletActionsService::new(self)
    }

    pub fn domains(&self) -> domains::DomainsService<'_> {
        domains::DomainsService::new(self)
    }

    pub fn load_balancers(&self) -> load_balancers::LoadBalancersService<'_> {
        load_balancers::LoadBalancersService::new(self)
    }

    pub fn vpcs(&self) -> vpcs::VpcsService<'_> {
        vpcs::VpcsService::new(self)
    }

    pub fn nat_gateways(&self) -> nat_gateways::NatGatewaysService<'_> {
        nat_gateways::NatGatewaysService::new(self)
    }

    pub fn byoip(&self) -> byoip::ByoipService<'_> {
        byoip::ByoipService::new(self)
    }

    pub fn databases(&self) -> databases::DatabasesService<'_> {
        databases::DatabasesService::new(self)
    }

    pub fn kubernetes(&self) -> kubernetes::KubernetesService<'_> {
        kubernetes::KubernetesService::new(self)
    }

    pub fn registry(&self) -> container_registry::RegistryService<'_> {
        container_registry::RegistryService::new(self)
    }

    pub fn genai(&self) -> genai::GenAiService<'_> {
        genai::GenAiService::new(self)
    }

    pub fn functions(&self) -> functions::FunctionsService<'_> {
        functions::FunctionsService::new(self)
    }

    pub fn uptime_checks(&self) -> uptime::UptimeChecksService<'_> {
        uptime::UptimeChecksService::new(self)
    }

    pub fn nfs(&self) -> nfs::NfsService<'_> {
        nfs::NfsService::new(self)
    }

    pub fn nfs_actions(&self) -> nfs::NfsActionsService<'_> {
        nfs::NfsActionsService::new(self)
    }

    pub fn spaces_keys(&self) -> spaces_keys::SpacesKeysService<'_> {
        spaces_keys::SpacesKeysService::new(self)
    }

    pub fn one_clicks(&self) -> one_clicks::OneClickService<'_> {
        one_clicks::OneClickService::new(self)
    }

    /// Partner attachments under `/v2/partner_network_connect`.
    pub fn partner_attachments(&self) -> partner_connect::PartnerAttachmentsService<'_> {
        partner_connect::PartnerAttachmentsService::new(self, partner_connect::PARTNER_NETWORK_CONNECT_PATH)
    }

    /// The same attachments under the older `/v2/partner_connect` root.
    pub fn partner_connect(&self) -> partner_connect::PartnerAttachmentsService<'_> {
        partner_connect::PartnerAttachmentsService::new(self, partner_connect::PARTNER_CONNECT_PATH)
    }

    pub fn security(&self) -> security::SecurityService<'_> {
        security::SecurityService::new(self)
    }
}
