//! Applications service: descriptors and their deployed instances.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{LabelMap, OrganizationId, Rpc, Success};

/// Register a descriptor. The request is the descriptor document itself
/// with the organization ID injected.
pub const ADD_DESCRIPTOR: Rpc<Value, AppDescriptor> = Rpc::new("Applications.AddDescriptor");
/// List descriptors.
pub const LIST_DESCRIPTORS: Rpc<OrganizationId, DescriptorList> =
    Rpc::new("Applications.ListDescriptors");
/// Retrieve a descriptor.
pub const GET_DESCRIPTOR: Rpc<AppDescriptorId, AppDescriptor> =
    Rpc::new("Applications.GetDescriptor");
/// Delete a descriptor.
pub const DELETE_DESCRIPTOR: Rpc<AppDescriptorId, Success> =
    Rpc::new("Applications.DeleteDescriptor");
/// List the parameters a descriptor accepts at deploy time.
pub const GET_PARAMETERS: Rpc<AppDescriptorId, AppParameterList> =
    Rpc::new("Applications.GetParameters");
/// Add or remove descriptor labels.
pub const UPDATE_DESCRIPTOR_LABELS: Rpc<UpdateDescriptorLabelsRequest, Success> =
    Rpc::new("Applications.UpdateDescriptorLabels");
/// Deploy an instance of a descriptor.
pub const DEPLOY: Rpc<DeployRequest, DeploymentResponse> = Rpc::new("Applications.Deploy");
/// Undeploy an instance.
pub const UNDEPLOY: Rpc<AppInstanceId, Success> = Rpc::new("Applications.Undeploy");
/// List instances.
pub const LIST_INSTANCES: Rpc<OrganizationId, InstanceList> =
    Rpc::new("Applications.ListInstances");
/// Retrieve an instance.
pub const GET_INSTANCE: Rpc<AppInstanceId, AppInstance> = Rpc::new("Applications.GetInstance");

/// Service declared by a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Service name.
    pub name: String,
    /// Container image.
    pub image: String,
    /// Number of replicas.
    #[serde(default)]
    pub replicas: i32,
}

/// Application template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
    /// Organization identifier.
    pub organization_id: String,
    /// Descriptor identifier.
    pub app_descriptor_id: String,
    /// Descriptor name.
    pub name: String,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Services, flattened across service groups.
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
}

/// Descriptors of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorList {
    /// Descriptors.
    #[serde(default)]
    pub descriptors: Vec<AppDescriptor>,
}

/// Identifies a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptorId {
    /// Organization identifier.
    pub organization_id: String,
    /// Descriptor identifier.
    pub app_descriptor_id: String,
}

/// Deploy-time parameter of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppParameter {
    /// Parameter name.
    pub name: String,
    /// Human description.
    #[serde(default)]
    pub description: String,
    /// Path of the descriptor field the parameter overrides.
    pub path: String,
    /// Value type.
    #[serde(default)]
    pub param_type: String,
    /// Value used when the parameter is not supplied.
    #[serde(default)]
    pub default_value: String,
    /// `BASIC` or `ADVANCED`.
    #[serde(default)]
    pub category: String,
}

/// Parameters of a descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppParameterList {
    /// Parameters.
    #[serde(default)]
    pub parameters: Vec<AppParameter>,
}

/// Label change on a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptorLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Descriptor identifier.
    pub app_descriptor_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}

/// Value supplied for a parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceParameter {
    /// Parameter name.
    pub parameter_name: String,
    /// Value.
    pub value: String,
}

/// Deployment of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Descriptor to deploy.
    pub app_descriptor_id: String,
    /// Instance name.
    pub name: String,
    /// Parameter overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<InstanceParameter>,
}

/// Acknowledgement of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    /// Request identifier.
    pub request_id: String,
    /// Identifier of the new instance.
    pub app_instance_id: String,
    /// Deployment status.
    pub status: String,
}

/// Identifies an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppInstanceId {
    /// Organization identifier.
    pub organization_id: String,
    /// Instance identifier.
    pub app_instance_id: String,
}

/// Running service of an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    /// Service name.
    pub name: String,
    /// Service instance identifier.
    pub service_instance_id: String,
    /// Service status.
    pub status: String,
    /// Public endpoints.
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Service group of an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroupInstance {
    /// Group name.
    pub name: String,
    /// Group instance identifier.
    pub service_group_instance_id: String,
    /// Group status.
    pub status: String,
    /// Services of the group.
    #[serde(default)]
    pub service_instances: Vec<ServiceInstance>,
}

/// Deployed application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppInstance {
    /// Organization identifier.
    pub organization_id: String,
    /// Descriptor the instance was deployed from.
    pub app_descriptor_id: String,
    /// Instance identifier.
    pub app_instance_id: String,
    /// Instance name.
    pub name: String,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Instance status.
    pub status: String,
    /// Service groups.
    #[serde(default)]
    pub groups: Vec<ServiceGroupInstance>,
}

/// Instances of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceList {
    /// Instances.
    #[serde(default)]
    pub instances: Vec<AppInstance>,
}
