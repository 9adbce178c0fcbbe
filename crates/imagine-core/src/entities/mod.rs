//! Entity and payload structs for every backend resource family.
//!
//! Response records derive `Serialize`, `Deserialize`, and `JsonSchema`; request
//! payloads skip `None` fields so partial updates only send what changed.

mod analysis;
mod dashboard;
mod experiment;
mod export;
mod organization;
mod pipeline;
mod product;
mod rate_limit;
mod upload;
mod user;
mod webhook;

pub use analysis::{AnalysisResult, BoundingBox, DetectedDefect, ExtractedAttribute};
pub use dashboard::{CategoryDistribution, DashboardStats, RecentActivity};
pub use experiment::{
    AbExperiment, AbExperimentCreate, AbExperimentUpdate, AbVariant, AbVariantCreate,
    AbVariantStats,
};
pub use export::{ExportFilter, ExportJob, ExportRequest};
pub use organization::{
    InviteMemberRequest, Organization, OrganizationCreate, OrganizationMember,
    UpdateMemberRoleRequest,
};
pub use pipeline::{
    BatchCreateRequest, JobListResponse, JobQuery, JobStep, ProcessingJob, ProcessingUpdate,
    ProcessingUpdateKind, Progress,
};
pub use product::{Product, ProductCreate, ProductImage, ProductQuery, ProductUpdate};
pub use rate_limit::{RateLimitConfig, RateLimitConfigCreate, RateLimitConfigUpdate};
pub use upload::{
    DirectUploadResponse, MAX_UPLOAD_BYTES, PresignedUrlRequest, PresignedUrlResponse,
    RetryAnalysisResponse, UploadConfirmRequest, UploadConfirmResponse,
};
pub use user::{LoginRequest, RefreshRequest, TokenPair, User, UserCreate};
pub use webhook::{WebhookCreate, WebhookDelivery, WebhookEndpoint, WebhookTestResponse, WebhookUpdate};
