//! Application descriptors and instances.
//!
//! `app desc add` reads a descriptor document from disk and registers it
//! under the current organization. Any `organizationId` in the file is
//! replaced.

use std::io::Write;
use std::path::Path;

use nalej_proto::OrganizationId;
use nalej_proto::applications::{
    self, AppDescriptor, AppDescriptorId, AppInstance, AppInstanceId, AppParameterList,
    DeployRequest, DeploymentResponse, DescriptorList, InstanceList, InstanceParameter,
    UpdateDescriptorLabelsRequest,
};
use serde_json::Value;
use tracing::debug;

use super::{label_change, label_message};
use crate::cli::{AppCommands, DescriptorCommands, InstanceCommands};
use crate::client::Platform;
use crate::error::CliError;
use crate::labels;
use crate::output::{Message, TableDisplay, or_dash, print_table, table};
use crate::settings::Settings;
use crate::validate::{parse_params, read_file, require, resolve_argument};

fn descriptors_table<W: Write>(
    writer: &mut W,
    descriptors: &[AppDescriptor],
    label_length: i64,
) -> Result<(), CliError> {
    let mut t = table(&["NAME", "ID", "SERVICES", "LABELS"]);
    for d in descriptors {
        t.add_row(vec![
            d.name.clone(),
            d.app_descriptor_id.clone(),
            d.services.len().to_string(),
            labels::display(&d.labels, label_length),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for AppDescriptor {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        descriptors_table(writer, std::slice::from_ref(self), label_length)?;
        if self.services.is_empty() {
            return Ok(());
        }
        let mut t = table(&["SERVICE", "IMAGE", "REPLICAS"]);
        for s in &self.services {
            t.add_row(vec![s.name.clone(), s.image.clone(), s.replicas.to_string()]);
        }
        print_table(writer, &t)
    }
}

impl TableDisplay for DescriptorList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        descriptors_table(writer, &self.descriptors, label_length)
    }
}

impl TableDisplay for AppParameterList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["NAME", "PATH", "TYPE", "DEFAULT", "CATEGORY", "DESCRIPTION"]);
        for p in &self.parameters {
            t.add_row(vec![
                p.name.clone(),
                p.path.clone(),
                or_dash(&p.param_type),
                or_dash(&p.default_value),
                or_dash(&p.category),
                or_dash(&p.description),
            ]);
        }
        print_table(writer, &t)
    }
}

impl TableDisplay for DeploymentResponse {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["REQUEST", "INSTANCE", "STATUS"]);
        t.add_row(vec![
            self.request_id.clone(),
            self.app_instance_id.clone(),
            self.status.clone(),
        ]);
        print_table(writer, &t)
    }
}

fn instances_table<W: Write>(
    writer: &mut W,
    instances: &[AppInstance],
    label_length: i64,
) -> Result<(), CliError> {
    let mut t = table(&["NAME", "ID", "DESCRIPTOR", "LABELS", "STATUS"]);
    for i in instances {
        t.add_row(vec![
            i.name.clone(),
            i.app_instance_id.clone(),
            i.app_descriptor_id.clone(),
            labels::display(&i.labels, label_length),
            i.status.clone(),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for AppInstance {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        instances_table(writer, std::slice::from_ref(self), label_length)?;
        if self.groups.is_empty() {
            return Ok(());
        }
        let mut t = table(&["GROUP", "SERVICE", "ID", "STATUS", "ENDPOINTS"]);
        for g in &self.groups {
            t.add_row(vec![
                g.name.clone(),
                "-".to_string(),
                g.service_group_instance_id.clone(),
                g.status.clone(),
                "-".to_string(),
            ]);
            for s in &g.service_instances {
                t.add_row(vec![
                    String::new(),
                    s.name.clone(),
                    s.service_instance_id.clone(),
                    s.status.clone(),
                    or_dash(&s.endpoints.join(",")),
                ]);
            }
        }
        print_table(writer, &t)
    }
}

impl TableDisplay for InstanceList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        instances_table(writer, &self.instances, label_length)
    }
}

/// Load a descriptor document and bind it to `organization_id`.
fn load_descriptor(path: &Path, organization_id: String) -> Result<Value, CliError> {
    let raw = read_file(path)?;
    let mut descriptor: Value = serde_json::from_str(&raw).map_err(|e| {
        CliError::usage(format!("{} is not a valid descriptor: {e}", path.display()))
    })?;
    let Some(fields) = descriptor.as_object_mut() else {
        return Err(CliError::usage(format!(
            "{} is not a valid descriptor: expected a JSON object",
            path.display()
        )));
    };
    fields.insert("organizationId".to_string(), Value::String(organization_id));
    Ok(descriptor)
}

/// Handler for the app command.
pub struct AppCommand<'a> {
    settings: &'a Settings,
}

impl<'a> AppCommand<'a> {
    /// Creates a new app command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an app subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails. `app desc label`
    /// without a descriptor yields [`CliError::MissingArgument`].
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &AppCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        match command {
            AppCommands::Descriptor { command } => {
                self.descriptor(platform, out, organization_id, command).await
            }
            AppCommands::Instance { command } => {
                self.instance(platform, out, organization_id, command).await
            }
        }
    }

    async fn descriptor<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        organization_id: String,
        command: &DescriptorCommands,
    ) -> Result<(), CliError> {
        let format = &self.settings.output;

        match command {
            DescriptorCommands::Add { path } => {
                let descriptor = load_descriptor(path, organization_id)?;
                debug!(path = %path.display(), "registering descriptor");
                let added = platform
                    .call(&applications::ADD_DESCRIPTOR, &descriptor)
                    .await?;
                format.write(out, &added)
            }
            DescriptorCommands::List => {
                let list = platform
                    .call(
                        &applications::LIST_DESCRIPTORS,
                        &OrganizationId::new(organization_id),
                    )
                    .await?;
                format.write(out, &list)
            }
            DescriptorCommands::Info { descriptor_id } => {
                let request = descriptor_ref(organization_id, descriptor_id)?;
                let descriptor = platform
                    .call(&applications::GET_DESCRIPTOR, &request)
                    .await?;
                format.write(out, &descriptor)
            }
            DescriptorCommands::Delete { descriptor_id } => {
                let request = descriptor_ref(organization_id, descriptor_id)?;
                platform
                    .call(&applications::DELETE_DESCRIPTOR, &request)
                    .await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Descriptor {} deleted",
                        request.app_descriptor_id
                    )),
                )
            }
            DescriptorCommands::Params { descriptor_id } => {
                let request = descriptor_ref(organization_id, descriptor_id)?;
                let params = platform
                    .call(&applications::GET_PARAMETERS, &request)
                    .await?;
                format.write(out, &params)
            }
            DescriptorCommands::Label {
                descriptor_id,
                descriptor_id_flag,
                change,
            } => {
                let app_descriptor_id = resolve_argument(
                    "descriptorID",
                    descriptor_id.as_deref(),
                    descriptor_id_flag.as_deref(),
                )?;
                let (add, labels) = label_change(change)?;
                let request = UpdateDescriptorLabelsRequest {
                    organization_id,
                    app_descriptor_id,
                    add,
                    labels,
                };
                platform
                    .call(&applications::UPDATE_DESCRIPTOR_LABELS, &request)
                    .await?;
                format.write(
                    out,
                    &Message::success(label_message(
                        add,
                        &format!("descriptor {}", request.app_descriptor_id),
                    )),
                )
            }
        }
    }

    async fn instance<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        organization_id: String,
        command: &InstanceCommands,
    ) -> Result<(), CliError> {
        let format = &self.settings.output;

        match command {
            InstanceCommands::Deploy {
                descriptor_id,
                name,
                params,
            } => {
                let app_descriptor_id = require("descriptor ID", descriptor_id)?.to_string();
                let name = require("instance name", name)?.to_string();
                let parameters = parse_params(params.as_deref().unwrap_or_default())?
                    .into_iter()
                    .map(|(parameter_name, value)| InstanceParameter {
                        parameter_name,
                        value,
                    })
                    .collect();
                let request = DeployRequest {
                    organization_id,
                    app_descriptor_id,
                    name,
                    parameters,
                };
                let response = platform.call(&applications::DEPLOY, &request).await?;
                format.write(out, &response)
            }
            InstanceCommands::Undeploy { instance_id } => {
                let request = instance_ref(organization_id, instance_id)?;
                platform.call(&applications::UNDEPLOY, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Instance {} undeployed",
                        request.app_instance_id
                    )),
                )
            }
            InstanceCommands::List => {
                let list = platform
                    .call(
                        &applications::LIST_INSTANCES,
                        &OrganizationId::new(organization_id),
                    )
                    .await?;
                format.write(out, &list)
            }
            InstanceCommands::Info { instance_id } => {
                let request = instance_ref(organization_id, instance_id)?;
                let instance = platform.call(&applications::GET_INSTANCE, &request).await?;
                format.write(out, &instance)
            }
        }
    }
}

fn descriptor_ref(organization_id: String, id: &str) -> Result<AppDescriptorId, CliError> {
    Ok(AppDescriptorId {
        organization_id,
        app_descriptor_id: require("descriptor ID", id)?.to_string(),
    })
}

/// Reference to an instance of `organization_id`.
pub(crate) fn instance_ref(organization_id: String, id: &str) -> Result<AppInstanceId, CliError> {
    Ok(AppInstanceId {
        organization_id,
        app_instance_id: require("instance ID", id)?.to_string(),
    })
}
