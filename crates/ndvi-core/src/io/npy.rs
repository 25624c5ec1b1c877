use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tracing::info;

use crate::consts::RAW_ARRAY_EXTENSION;
use crate::error::{NdviError, Result};

pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Header plus preamble is padded to a multiple of this many bytes.
const NPY_ALIGNMENT: usize = 64;

/// Element types with a fixed little-endian NPY encoding.
pub trait NpyElement: Copy + 'static {
    /// NumPy dtype descriptor, e.g. `<f4`.
    const DESCR: &'static str;

    fn write_le<W: Write>(self, w: &mut W) -> io::Result<()>;
    fn read_le<R: Read>(r: &mut R) -> io::Result<Self>;
}

impl NpyElement for u8 {
    const DESCR: &'static str = "|u1";

    fn write_le<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u8(self)
    }

    fn read_le<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_u8()
    }
}

impl NpyElement for u16 {
    const DESCR: &'static str = "<u2";

    fn write_le<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self)
    }

    fn read_le<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_u16::<LittleEndian>()
    }
}

impl NpyElement for f32 {
    const DESCR: &'static str = "<f4";

    fn write_le<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_f32::<LittleEndian>(self)
    }

    fn read_le<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_f32::<LittleEndian>()
    }
}

/// Path of the raw array dump that accompanies `path`.
pub fn raw_output_path(path: &Path) -> PathBuf {
    path.with_extension(RAW_ARRAY_EXTENSION)
}

/// Save an array in NPY v1.0 format, C order.
pub fn save_npy<T: NpyElement>(array: &ArrayViewD<'_, T>, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    let header = build_header(T::DESCR, array.shape());
    w.write_all(NPY_MAGIC)?;
    // Version 1.0
    w.write_all(&[1u8, 0u8])?;
    w.write_u16::<LittleEndian>(header.len() as u16)?;
    w.write_all(header.as_bytes())?;

    for &v in array.iter() {
        v.write_le(&mut w)?;
    }
    w.flush()?;

    info!(path = %path.display(), shape = ?array.shape(), dtype = T::DESCR, "Saved raw array");
    Ok(())
}

fn build_header(descr: &str, shape: &[usize]) -> String {
    let dims = match shape {
        [] => "()".to_string(),
        [n] => format!("({n},)"),
        _ => {
            let parts: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    };
    let mut header = format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {dims}, }}");

    // magic + version + u16 length + header + trailing newline
    let unpadded = NPY_MAGIC.len() + 2 + 2 + header.len() + 1;
    let pad = (NPY_ALIGNMENT - unpadded % NPY_ALIGNMENT) % NPY_ALIGNMENT;
    header.push_str(&" ".repeat(pad));
    header.push('\n');
    header
}

/// Load an NPY file written in C order with the dtype of `T`.
pub fn load_npy<T: NpyElement>(path: &Path) -> Result<ArrayD<T>> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut r = BufReader::new(file);

    let mut magic = [0u8; 6];
    r.read_exact(&mut magic)?;
    if &magic != NPY_MAGIC {
        return Err(NdviError::InvalidNpy("bad magic".into()));
    }
    let major = r.read_u8()?;
    let _minor = r.read_u8()?;
    let (header_len, len_field) = match major {
        1 => (r.read_u16::<LittleEndian>()? as usize, 2),
        2 | 3 => (r.read_u32::<LittleEndian>()? as usize, 4),
        v => return Err(NdviError::InvalidNpy(format!("unsupported version {v}"))),
    };

    if header_len as u64 > file_len {
        return Err(NdviError::InvalidNpy(format!(
            "header length {header_len} exceeds file size {file_len}"
        )));
    }
    let mut header = vec![0u8; header_len];
    r.read_exact(&mut header)?;
    let header = String::from_utf8_lossy(&header);

    let descr = header_value(&header, "descr")
        .and_then(|v| v.trim().strip_prefix('\'').and_then(|v| v.split('\'').next()))
        .ok_or_else(|| NdviError::InvalidNpy("missing descr".into()))?;
    if descr != T::DESCR {
        return Err(NdviError::InvalidNpy(format!(
            "dtype {descr} does not match expected {}",
            T::DESCR
        )));
    }
    if header_value(&header, "fortran_order").is_some_and(|v| v.trim_start().starts_with("True")) {
        return Err(NdviError::InvalidNpy("fortran order is not supported".into()));
    }
    let shape = parse_shape(&header)?;

    let count = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NdviError::InvalidNpy(format!("shape {shape:?} overflows")))?;
    let data_len = count
        .checked_mul(std::mem::size_of::<T>())
        .ok_or_else(|| NdviError::InvalidNpy(format!("shape {shape:?} overflows")))?;
    let data_start = (NPY_MAGIC.len() + 2 + len_field + header_len) as u64;
    let available = file_len.saturating_sub(data_start);
    if data_len as u64 > available {
        return Err(NdviError::InvalidNpy(format!(
            "shape {shape:?} needs {data_len} bytes, file holds {available}"
        )));
    }

    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        data.push(T::read_le(&mut r)?);
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?)
}

/// Text following `'key':` in a header dict.
fn header_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let tag = format!("'{key}':");
    header.find(&tag).map(|i| &header[i + tag.len()..])
}

fn parse_shape(header: &str) -> Result<Vec<usize>> {
    let rest = header_value(header, "shape")
        .ok_or_else(|| NdviError::InvalidNpy("missing shape".into()))?;
    let open = rest
        .find('(')
        .ok_or_else(|| NdviError::InvalidNpy("malformed shape".into()))?;
    let inner = &rest[open + 1..];
    let close = inner
        .find(')')
        .ok_or_else(|| NdviError::InvalidNpy("malformed shape".into()))?;
    inner[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| NdviError::InvalidNpy(format!("bad dimension '{s}'")))
        })
        .collect()
}
