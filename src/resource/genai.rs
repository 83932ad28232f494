//! GenAI agents, their API keys, versions, knowledge bases and the model
//! catalog
//!
//! Agents and knowledge bases are addressed by UUID. Agent updates are
//! partial (PATCH) while API key, version and knowledge base changes use PUT,
//! mirroring the API.

use crate::api::options::{is_false, is_zero};
use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const GENAI_PATH: &str = "/v2/gen-ai";
const AGENTS_PATH: &str = "/v2/gen-ai/agents";
const KNOWLEDGE_BASES_PATH: &str = "/v2/gen-ai/knowledge_bases";

pub const VISIBILITY_PUBLIC: &str = "VISIBILITY_PUBLIC";
pub const VISIBILITY_PRIVATE: &str = "VISIBILITY_PRIVATE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instruction: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub if_case: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub k: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub top_p: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub retrieval_method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_created_by: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<AgentDeployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatbot: Option<ChatBot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chatbot_identifiers: Vec<ChatbotIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<AgentApiKeyInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_key_infos: Vec<AgentApiKeyInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_keys: Vec<AgentApiKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<AgentTemplate>,
    /// Knowledge bases attached to the agent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_bases: Vec<KnowledgeBase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentApiKey {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotIdentifier {
    #[serde(default)]
    pub agent_chatbot_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDeployment {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: String,
    /// One of [`VISIBILITY_PUBLIC`] or [`VISIBILITY_PRIVATE`]
    #[serde(default)]
    pub visibility: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// Appearance of the embeddable chatbot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBot {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secondary_color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub button_background_color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub starting_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inference_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inference_version: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_foundational: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub upload_complete: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usecases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ModelVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement: Option<Agreement>,
    /// Free-form parameter limits and licensing details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    #[serde(default)]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub patch: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// The template an agent was created from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instruction: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub k: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub top_p: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_bases: Vec<KnowledgeBase>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub database_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub embedding_model_uuid: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_indexing_job: Option<LastIndexingJob>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub added_to_agent_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// Progress of the most recent indexing run over a knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastIndexingJob {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub knowledge_base_uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phase: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_source_uuids: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub completed_datasources: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_datasources: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Content indexed into a knowledge base. Exactly one of the source
/// variants is normally set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseDataSource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bucket_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spaces_data_source: Option<SpacesDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_crawler_data_source: Option<WebCrawlerDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload_data_source: Option<FileUploadDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_indexing_job: Option<LastIndexingJob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacesDataSource {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub item_path: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCrawlerDataSource {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub crawling_option: String,
    #[serde(default)]
    pub embed_media: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadDataSource {
    #[serde(default)]
    pub original_file_name: String,
    /// Byte count, sent as a string
    #[serde(default, rename = "size_in_bytes")]
    pub size: String,
    #[serde(default)]
    pub stored_object_key: String,
}

/// A snapshot of an agent's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentVersion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub agent_uuid: String,
    #[serde(default)]
    pub version_hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instruction: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_name: String,
    #[serde(default)]
    pub currently_applied: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creating_user_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trigger_action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub retrieval_method: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub k: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub top_p: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_child_agents: Vec<AttachedChildAgent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_functions: Vec<AttachedFunction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_guardrails: Vec<AttachedGuardrail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_knowledgebases: Vec<AttachedKnowledgebase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedChildAgent {
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub child_agent_uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub if_case: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub faas_name: String,
    #[serde(default)]
    pub faas_namespace: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedGuardrail {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedKnowledgebase {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentApiKeyInfo {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    /// Only returned on create and regenerate
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instruction: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub knowledge_base_uuid: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub anthropic_key_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub open_ai_key_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub retrieval_method: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial agent update. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instruction: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub anthropic_key_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub open_ai_key_uuid: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub k: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub temperature: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub top_p: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentVisibilityUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    pub visibility: String,
}

/// Roll an agent back (or forward) to a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentVersionUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    pub version_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentVersionUpdateResponse {
    #[serde(default)]
    pub version_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_header: Option<AuditHeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHeader {
    #[serde(default)]
    pub actor_id: String,
    #[serde(default)]
    pub actor_ip: String,
    #[serde(default)]
    pub actor_uuid: String,
    #[serde(default)]
    pub context_urn: String,
    #[serde(default)]
    pub origin_application: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentApiKeyCreateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentApiKeyUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key_uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseCreateRequest {
    pub name: String,
    pub embedding_model_uuid: String,
    pub project_id: String,
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub database_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(rename = "datasources", skip_serializing_if = "Vec::is_empty")]
    pub data_sources: Vec<KnowledgeBaseDataSource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub database_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub embedding_model_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddDataSourceRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub knowledge_base_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces_data_source: Option<SpacesDataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_crawler_data_source: Option<WebCrawlerDataSource>,
}

/// Identifiers echoed back when a data source is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeletedDataSource {
    #[serde(default)]
    pub knowledge_base_uuid: String,
    #[serde(default)]
    pub data_source_uuid: String,
}

#[derive(Deserialize)]
struct KnowledgeBaseRoot {
    knowledge_base: KnowledgeBase,
}

#[derive(Deserialize)]
struct KnowledgeBasesRoot {
    #[serde(default)]
    knowledge_bases: Vec<KnowledgeBase>,
}

#[derive(Deserialize)]
struct DeletedKnowledgeBaseRoot {
    #[serde(default)]
    uuid: String,
}

#[derive(Deserialize)]
struct DataSourceRoot {
    knowledge_base_data_source: KnowledgeBaseDataSource,
}

#[derive(Deserialize)]
struct DataSourcesRoot {
    #[serde(default)]
    knowledge_base_data_sources: Vec<KnowledgeBaseDataSource>,
}

#[derive(Deserialize)]
struct AgentRoot {
    agent: Agent,
}

#[derive(Deserialize)]
struct AgentsRoot {
    #[serde(default)]
    agents: Vec<Agent>,
}

#[derive(Deserialize)]
struct AgentVersionsRoot {
    #[serde(default)]
    agent_versions: Vec<AgentVersion>,
}

#[derive(Deserialize)]
struct AgentVersionUpdateRoot {
    agent_version: AgentVersionUpdateResponse,
}

#[derive(Deserialize)]
struct ApiKeyInfoRoot {
    api_key_info: AgentApiKeyInfo,
}

#[derive(Deserialize)]
struct ApiKeyInfosRoot {
    #[serde(default)]
    api_key_infos: Vec<AgentApiKeyInfo>,
}

#[derive(Deserialize)]
struct ModelsRoot {
    #[serde(default)]
    models: Vec<Model>,
}

pub struct GenAiService<'a> {
    client: &'a Client,
}

impl<'a> GenAiService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Agent>, Response)> {
        let path = add_options(AGENTS_PATH, opts)?;
        let (root, resp): (AgentsRoot, _) = self.client.get(&path).await?;
        Ok((root.agents, resp))
    }

    pub async fn create(&self, req: &AgentCreateRequest) -> Result<(Agent, Response)> {
        let (root, resp): (AgentRoot, _) = self.client.post(AGENTS_PATH, req).await?;
        Ok((root.agent, resp))
    }

    pub async fn get(&self, agent_id: &str) -> Result<(Agent, Response)> {
        let path = agent_path(agent_id)?;
        let (root, resp): (AgentRoot, _) = self.client.get(&path).await?;
        Ok((root.agent, resp))
    }

    pub async fn update(&self, agent_id: &str, req: &AgentUpdateRequest) -> Result<(Agent, Response)> {
        let path = agent_path(agent_id)?;
        let (root, resp): (AgentRoot, _) = self.client.patch(&path, req).await?;
        Ok((root.agent, resp))
    }

    /// Delete an agent. The API echoes the deleted agent back.
    pub async fn delete(&self, agent_id: &str) -> Result<(Agent, Response)> {
        let path = agent_path(agent_id)?;
        let (root, resp): (AgentRoot, _) = self
            .client
            .send(reqwest::Method::DELETE, &path, None::<&()>)
            .await?;
        Ok((root.agent, resp))
    }

    pub async fn update_visibility(
        &self,
        agent_id: &str,
        req: &AgentVisibilityUpdateRequest,
    ) -> Result<(Agent, Response)> {
        let path = format!("{}/deployment_visibility", agent_path(agent_id)?);
        let (root, resp): (AgentRoot, _) = self.client.put(&path, req).await?;
        Ok((root.agent, resp))
    }

    pub async fn list_api_keys(
        &self,
        agent_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<AgentApiKeyInfo>, Response)> {
        let path = add_options(&format!("{}/api_keys", agent_path(agent_id)?), opts)?;
        let (root, resp): (ApiKeyInfosRoot, _) = self.client.get(&path).await?;
        Ok((root.api_key_infos, resp))
    }

    pub async fn create_api_key(
        &self,
        agent_id: &str,
        req: &AgentApiKeyCreateRequest,
    ) -> Result<(AgentApiKeyInfo, Response)> {
        let path = format!("{}/api_keys", agent_path(agent_id)?);
        let (root, resp): (ApiKeyInfoRoot, _) = self.client.post(&path, req).await?;
        Ok((root.api_key_info, resp))
    }

    pub async fn update_api_key(
        &self,
        agent_id: &str,
        key_id: &str,
        req: &AgentApiKeyUpdateRequest,
    ) -> Result<(AgentApiKeyInfo, Response)> {
        let path = api_key_path(agent_id, key_id)?;
        let (root, resp): (ApiKeyInfoRoot, _) = self.client.put(&path, req).await?;
        Ok((root.api_key_info, resp))
    }

    pub async fn delete_api_key(
        &self,
        agent_id: &str,
        key_id: &str,
    ) -> Result<(AgentApiKeyInfo, Response)> {
        let path = api_key_path(agent_id, key_id)?;
        let (root, resp): (ApiKeyInfoRoot, _) = self
            .client
            .send(reqwest::Method::DELETE, &path, None::<&()>)
            .await?;
        Ok((root.api_key_info, resp))
    }

    /// Issue a new secret for an existing key.
    pub async fn regenerate_api_key(
        &self,
        agent_id: &str,
        key_id: &str,
    ) -> Result<(AgentApiKeyInfo, Response)> {
        let path = format!("{}/regenerate", api_key_path(agent_id, key_id)?);
        let (root, resp): (ApiKeyInfoRoot, _) = self
            .client
            .send(reqwest::Method::PUT, &path, None::<&()>)
            .await?;
        Ok((root.api_key_info, resp))
    }

    pub async fn list_versions(
        &self,
        agent_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<AgentVersion>, Response)> {
        let path = add_options(&format!("{}/versions", agent_path(agent_id)?), opts)?;
        let (root, resp): (AgentVersionsRoot, _) = self.client.get(&path).await?;
        Ok((root.agent_versions, resp))
    }

    pub async fn update_version(
        &self,
        agent_id: &str,
        req: &AgentVersionUpdateRequest,
    ) -> Result<(AgentVersionUpdateResponse, Response)> {
        let path = format!("{}/versions", agent_path(agent_id)?);
        let (root, resp): (AgentVersionUpdateRoot, _) = self.client.put(&path, req).await?;
        Ok((root.agent_version, resp))
    }

    pub async fn list_knowledge_bases(
        &self,
        opts: &ListOptions,
    ) -> Result<(Vec<KnowledgeBase>, Response)> {
        let path = add_options(KNOWLEDGE_BASES_PATH, opts)?;
        let (root, resp): (KnowledgeBasesRoot, _) = self.client.get(&path).await?;
        Ok((root.knowledge_bases, resp))
    }

    pub async fn create_knowledge_base(
        &self,
        req: &KnowledgeBaseCreateRequest,
    ) -> Result<(KnowledgeBase, Response)> {
        let (root, resp): (KnowledgeBaseRoot, _) =
            self.client.post(KNOWLEDGE_BASES_PATH, req).await?;
        Ok((root.knowledge_base, resp))
    }

    pub async fn get_knowledge_base(&self, kb_id: &str) -> Result<(KnowledgeBase, Response)> {
        let path = knowledge_base_path(kb_id)?;
        let (root, resp): (KnowledgeBaseRoot, _) = self.client.get(&path).await?;
        Ok((root.knowledge_base, resp))
    }

    pub async fn update_knowledge_base(
        &self,
        kb_id: &str,
        req: &KnowledgeBaseUpdateRequest,
    ) -> Result<(KnowledgeBase, Response)> {
        let path = knowledge_base_path(kb_id)?;
        let (root, resp): (KnowledgeBaseRoot, _) = self.client.put(&path, req).await?;
        Ok((root.knowledge_base, resp))
    }

    /// Delete a knowledge base, returning the UUID the API reports as removed.
    pub async fn delete_knowledge_base(&self, kb_id: &str) -> Result<(String, Response)> {
        let path = knowledge_base_path(kb_id)?;
        let (root, resp): (DeletedKnowledgeBaseRoot, _) = self
            .client
            .send(reqwest::Method::DELETE, &path, None::<&()>)
            .await?;
        Ok((root.uuid, resp))
    }

    pub async fn list_data_sources(
        &self,
        kb_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<KnowledgeBaseDataSource>, Response)> {
        let path = add_options(&format!("{}/data_sources", knowledge_base_path(kb_id)?), opts)?;
        let (root, resp): (DataSourcesRoot, _) = self.client.get(&path).await?;
        Ok((root.knowledge_base_data_sources, resp))
    }

    pub async fn add_data_source(
        &self,
        kb_id: &str,
        req: &AddDataSourceRequest,
    ) -> Result<(KnowledgeBaseDataSource, Response)> {
        let path = format!("{}/data_sources", knowledge_base_path(kb_id)?);
        let (root, resp): (DataSourceRoot, _) = self.client.post(&path, req).await?;
        Ok((root.knowledge_base_data_source, resp))
    }

    pub async fn delete_data_source(
        &self,
        kb_id: &str,
        data_source_id: &str,
    ) -> Result<(DeletedDataSource, Response)> {
        require_non_empty("dataSourceID", data_source_id)?;
        let path = format!(
            "{}/data_sources/{}",
            knowledge_base_path(kb_id)?,
            urlencoding::encode(data_source_id)
        );
        self.client
            .send(reqwest::Method::DELETE, &path, None::<&()>)
            .await
    }

    /// Make a knowledge base available to an agent's retrieval.
    pub async fn attach_knowledge_base(&self, agent_id: &str, kb_id: &str) -> Result<(Agent, Response)> {
        let path = agent_knowledge_base_path(agent_id, kb_id)?;
        let (root, resp): (AgentRoot, _) = self
            .client
            .send(reqwest::Method::POST, &path, None::<&()>)
            .await?;
        Ok((root.agent, resp))
    }

    pub async fn detach_knowledge_base(&self, agent_id: &str, kb_id: &str) -> Result<(Agent, Response)> {
        let path = agent_knowledge_base_path(agent_id, kb_id)?;
        let (root, resp): (AgentRoot, _) = self
            .client
            .send(reqwest::Method::DELETE, &path, None::<&()>)
            .await?;
        Ok((root.agent, resp))
    }

    /// Models agents can be built on.
    pub async fn list_models(&self, opts: &ListOptions) -> Result<(Vec<Model>, Response)> {
        let path = add_options(&format!("{}/models", GENAI_PATH), opts)?;
        let (root, resp): (ModelsRoot, _) = self.client.get(&path).await?;
        Ok((root.models, resp))
    }
}

fn agent_path(agent_id: &str) -> Result<String> {
    require_non_empty("agentID", agent_id)?;
    Ok(format!("{}/{}", AGENTS_PATH, urlencoding::encode(agent_id)))
}

fn api_key_path(agent_id: &str, key_id: &str) -> Result<String> {
    require_non_empty("apiKeyID", key_id)?;
    Ok(format!(
        "{}/api_keys/{}",
        agent_path(agent_id)?,
        urlencoding::encode(key_id)
    ))
}

fn knowledge_base_path(kb_id: &str) -> Result<String> {
    require_non_empty("knowledgeBaseID", kb_id)?;
    Ok(format!("{}/{}", KNOWLEDGE_BASES_PATH, urlencoding::encode(kb_id)))
}

fn agent_knowledge_base_path(agent_id: &str, kb_id: &str) -> Result<String> {
    require_non_empty("knowledgeBaseID", kb_id)?;
    Ok(format!(
        "{}/knowledge_bases/{}",
        agent_path(agent_id)?,
        urlencoding::encode(kb_id)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_decodes_nested_model() {
        let agent: Agent = serde_json::from_value(json!({
            "uuid": "00000000-0000-0000-0000-000000000000",
            "name": "testing-godo",
            "model": {
                "uuid": "00000000-0000-0000-0000-000000000000",
                "name": "Llama 3.3 Instruct (70B)",
                "version": {"major": 1},
                "is_foundational": true,
                "metadata": {"max_tokens": {"default": 512}}
            },
            "deployment": {"status": "STATUS_RUNNING", "visibility": "VISIBILITY_PUBLIC"},
            "k": 0,
            "temperature": 0.7,
            "route_created_at": "0001-01-01T00:00:00Z"
        }))
        .unwrap();

        let model = agent.model.unwrap();
        assert_eq!(model.version.unwrap().major, 1);
        assert_eq!(model.metadata["max_tokens"]["default"], 512);
        assert_eq!(agent.deployment.unwrap().visibility, VISIBILITY_PUBLIC);
        assert_eq!(agent.temperature, 0.7);
    }

    #[test]
    fn test_update_request_is_partial() {
        let req = AgentUpdateRequest {
            tags: vec!["updated".to_string(), "example".to_string()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"tags": ["updated", "example"]})
        );
    }

    #[test]
    fn test_api_key_path_requires_key() {
        assert!(api_key_path("agent", "").is_err());
        assert_eq!(
            api_key_path("agent", "key").unwrap(),
            "/v2/gen-ai/agents/agent/api_keys/key"
        );
    }

    #[test]
    fn test_knowledge_base_paths() {
        assert!(knowledge_base_path("").is_err());
        assert!(agent_knowledge_base_path("agent", "").is_err());
        assert!(agent_knowledge_base_path("", "kb").is_err());
        assert_eq!(
            agent_knowledge_base_path("agent", "kb").unwrap(),
            "/v2/gen-ai/agents/agent/knowledge_bases/kb"
        );
    }

    #[test]
    fn test_data_source_decodes_file_upload() {
        let source: KnowledgeBaseDataSource = serde_json::from_value(json!({
            "uuid": "ds-1",
            "file_upload_data_source": {
                "original_file_name": "notes.pdf",
                "size_in_bytes": "2048",
                "stored_object_key": "uploads/notes.pdf"
            },
            "last_indexing_job": {
                "uuid": "job-1",
                "knowledge_base_uuid": "kb-1",
                "phase": "BATCH_JOB_PHASE_SUCCEEDED",
                "total_datasources": 1,
                "completed_datasources": 1,
                "finished_at": "2025-01-02T03:04:05Z"
            }
        }))
        .unwrap();

        assert_eq!(source.file_upload_data_source.unwrap().size, "2048");
        let job = source.last_indexing_job.unwrap();
        assert_eq!(job.completed_datasources, job.total_datasources);
        assert!(job.finished_at.is_some());
    }
}
