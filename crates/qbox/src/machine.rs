use std::fmt::{self, Display, Formatter};

use log::info;
use tokio::fs;

use crate::{
    definition::BoxDefinition,
    error::{Error, Result},
    image::{ImageDefinition, ImageSpec},
    runner::{CommandRunner, Invocation},
};

pub const QEMU_IMG: &str = "qemu-img";
pub const QEMU_SYSTEM_PREFIX: &str = "qemu-system-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOutcome {
    NotConfigured,
    AlreadyExists,
    Created,
}

/// A named virtual machine from the qemufile, with its disk image resolved.
/// An image definition that cannot be resolved is kept as `invalid_image`
/// and only reported when the image is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct QemuBox {
    pub name: String,
    pub definition: BoxDefinition,
    pub image: Option<ImageSpec>,
    pub invalid_image: Option<String>,
}

impl QemuBox {
    pub fn new(name: impl Into<String>, definition: BoxDefinition) -> QemuBox {
        let name = name.into();
        let (image, invalid_image) =
            match ImageDefinition::classify(&name, definition.image.as_ref()) {
                Ok(image) => (image.resolve(&name), None),
                Err(Error::InvalidImage { reason, .. }) => (None, Some(reason)),
                Err(error) => (None, Some(error.to_string())),
            };
        QemuBox {
            name,
            definition,
            image,
            invalid_image,
        }
    }

    pub fn architecture(&self) -> &str {
        self.definition.architecture()
    }

    pub fn image(&self) -> Result<Option<&ImageSpec>> {
        match self.invalid_image {
            Some(ref reason) => Err(Error::InvalidImage {
                name: self.name.clone(),
                reason: reason.clone(),
            }),
            None => Ok(self.image.as_ref()),
        }
    }

    pub fn image_invocation(&self) -> Result<Option<Invocation>> {
        Ok(self.image()?.map(|image| {
            Invocation::new(QEMU_IMG).args([
                "create",
                "-f",
                image.format.as_str(),
                image.file.as_str(),
                image.size.as_str(),
            ])
        }))
    }

    pub fn launch_invocation(&self) -> Result<Invocation> {
        let mut invocation = Invocation::new(format!(
            "{}{}",
            QEMU_SYSTEM_PREFIX,
            self.architecture()
        ))
        .args(self.definition.args());
        if let Some(image) = self.image()? {
            invocation = invocation.arg(image.file.clone());
        }
        Ok(invocation)
    }

    /// Creates the disk image unless it is unconfigured or already on disk.
    /// An existing image is never touched.
    pub async fn create_image(&self, runner: &dyn CommandRunner) -> Result<ImageOutcome> {
        let (Some(image), Some(invocation)) = (self.image()?, self.image_invocation()?) else {
            return Ok(ImageOutcome::NotConfigured);
        };

        if fs::try_exists(&image.file).await? {
            info!("image file {} already exists", image.file);
            return Ok(ImageOutcome::AlreadyExists);
        }

        info!("{}", invocation);
        match runner.run(&invocation).await? {
            0 => Ok(ImageOutcome::Created),
            code => Err(Error::ToolFailed {
                program: invocation.program,
                code,
            }),
        }
    }

    /// Creates the image if needed, then runs the emulator until it exits and
    /// returns its exit code.
    pub async fn start(&self, runner: &dyn CommandRunner) -> Result<i32> {
        self.create_image(runner).await?;
        let invocation = self.launch_invocation()?;
        info!("{}", invocation);
        runner.run(&invocation).await
    }
}

impl Display for QemuBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Box {}>", self.name)
    }
}
