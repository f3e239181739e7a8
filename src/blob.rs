//! Loading descriptor blobs, mostly from Linux sysfs.

use super::*;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

const SYSFS_PATH: &str = "/sys/bus/usb/devices";

/// Path of the cached descriptor file the kernel exposes for a device
/// directory name such as `1-4.2`.
pub fn sysfs_descriptors_path(bus_port: &str) -> PathBuf {
    Path::new(SYSFS_PATH).join(bus_port).join("descriptors")
}

/// An owned descriptor blob: a sysfs `descriptors` file, or the response to
/// GET_DESCRIPTOR(CONFIGURATION) with or without the device descriptor in front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DescriptorBlob {
    data: Vec<u8>,
}

impl DescriptorBlob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub async fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).await?;
        debug!("read {} descriptor bytes from {}", data.len(), path.display());
        Ok(Self::new(data))
    }

    /// Read until EOF
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Self> {
        let mut data = vec![];
        reader.read_to_end(&mut data).await?;
        Ok(Self::new(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn records(&self) -> Records<'_> {
        records(&self.data)
    }

    pub fn descriptors(&self) -> Descriptors<'_> {
        descriptors(&self.data)
    }

    /// Check the length chain, see [verify_descriptor]
    pub fn verify(&self) -> Result<usize, DescriptorError> {
        verify_descriptor(&self.data).inspect_err(|err| warn!("{err}"))
    }

    pub fn topology(&self) -> Result<DeviceTopology, DescriptorError> {
        DeviceTopology::parse(&self.data)
    }
}

impl From<Vec<u8>> for DescriptorBlob {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for DescriptorBlob {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// The text attributes sysfs keeps next to `descriptors`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SysfsIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub busnum: Option<u32>,
    pub devnum: Option<u32>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial: Option<String>,
}

impl SysfsIdentity {
    pub async fn read(device_dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = device_dir.as_ref();
        Ok(Self {
            vendor_id: read_hex(&dir.join("idVendor")).await?,
            product_id: read_hex(&dir.join("idProduct")).await?,
            busnum: read_decimal(&dir.join("busnum")).await?,
            devnum: read_decimal(&dir.join("devnum")).await?,
            manufacturer: read_optional(&dir.join("manufacturer")).await?,
            product: read_optional(&dir.join("product")).await?,
            serial: read_optional(&dir.join("serial")).await?,
        })
    }

    /// Whether a decoded device descriptor belongs to this sysfs entry
    pub fn matches(&self, device: &DeviceDescriptor) -> bool {
        self.vendor_id == device.vendor_id && self.product_id == device.product_id
    }
}

/// Missing attribute files are normal (no string descriptor, root hub, ...)
async fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text.trim_end().to_string())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

async fn read_hex(path: &Path) -> io::Result<u16> {
    let text = fs::read_to_string(path).await?;
    u16::from_str_radix(text.trim(), 16).map_err(|err| {
        io::Error::new(
            ErrorKind::InvalidData,
            format!("{}: {err}", path.display()),
        )
    })
}

async fn read_decimal(path: &Path) -> io::Result<Option<u32>> {
    match read_optional(path).await? {
        Some(text) => text.trim().parse().map(Some).map_err(|err| {
            io::Error::new(
                ErrorKind::InvalidData,
                format!("{}: {err}", path.display()),
            )
        }),
        None => Ok(None),
    }
}
