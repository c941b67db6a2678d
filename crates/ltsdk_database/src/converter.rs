//! # Stream Converters
//!
//! Every numeric value in a packed database passes through one conversion
//! point. A [`ByteOrder`] policy decides what happens there: [`NullConverter`]
//! passes host bytes through, [`SwapConverter`] reverses them. The policy is a
//! type parameter, so the choice costs nothing per value.
//!
//! Composite types are written component by component in a fixed order:
//!
//! | type             | order                  |
//! |------------------|------------------------|
//! | `Vector2/3/4`    | x, y, z, w             |
//! | `Rotation`       | x, y, z, w             |
//! | `RigidTransform` | pos, rot               |
//! | `Transform`      | pos, rot, scale        |
//! | `Plane`          | normal, dist           |

use std::marker::PhantomData;

use ltsdk_math::{Plane, RigidTransform, Rotation, Transform, Vector2, Vector3, Vector4};
use ltsdk_platform::{InStream, OutStream, StreamError, StreamResult};

use crate::config::Endian;

/// A fixed-size value that can be byte-swapped.
pub trait Primitive: Copy {
    /// Encoded byte array.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Host-order bytes.
    fn to_ne_bytes(self) -> Self::Bytes;

    /// Decodes host-order bytes.
    fn from_ne_bytes(bytes: Self::Bytes) -> Self;

    /// Reverses the byte order.
    #[must_use]
    fn swap_bytes(self) -> Self;
}

macro_rules! impl_primitive_int {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            type Bytes = [u8; std::mem::size_of::<$ty>()];

            #[inline]
            fn to_ne_bytes(self) -> Self::Bytes {
                <$ty>::to_ne_bytes(self)
            }

            #[inline]
            fn from_ne_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_ne_bytes(bytes)
            }

            #[inline]
            fn swap_bytes(self) -> Self {
                <$ty>::swap_bytes(self)
            }
        }
    )*};
}

impl_primitive_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_primitive_float {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            type Bytes = [u8; std::mem::size_of::<$ty>()];

            #[inline]
            fn to_ne_bytes(self) -> Self::Bytes {
                <$ty>::to_ne_bytes(self)
            }

            #[inline]
            fn from_ne_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_ne_bytes(bytes)
            }

            #[inline]
            fn swap_bytes(self) -> Self {
                <$ty>::from_bits(self.to_bits().swap_bytes())
            }
        }
    )*};
}

impl_primitive_float!(f32, f64);

impl Primitive for bool {
    type Bytes = [u8; 1];

    #[inline]
    fn to_ne_bytes(self) -> Self::Bytes {
        [u8::from(self)]
    }

    #[inline]
    fn from_ne_bytes(bytes: Self::Bytes) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn swap_bytes(self) -> Self {
        self
    }
}

/// Conversion policy applied at the single conversion point.
pub trait ByteOrder {
    /// Byte order this policy produces on disk.
    const ENDIAN: Endian;

    /// Converts one value between host and file order. Must be an involution.
    fn convert<P: Primitive>(value: P) -> P;
}

/// Passthrough: file bytes are host bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullConverter;

impl ByteOrder for NullConverter {
    const ENDIAN: Endian = Endian::Native;

    #[inline]
    fn convert<P: Primitive>(value: P) -> P {
        value
    }
}

/// Byte swap: file bytes are reversed host bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwapConverter;

impl ByteOrder for SwapConverter {
    const ENDIAN: Endian = Endian::Swapped;

    #[inline]
    fn convert<P: Primitive>(value: P) -> P {
        value.swap_bytes()
    }
}

/// Receives primitives on their way out.
pub trait PrimitiveSink {
    /// Writes one primitive through the conversion point.
    fn put<P: Primitive>(&mut self, value: P) -> StreamResult<()>;
}

/// Produces primitives on their way in.
pub trait PrimitiveSource {
    /// Reads one primitive through the conversion point.
    fn take<P: Primitive>(&mut self) -> StreamResult<P>;
}

/// A value with a fixed component order in packed files.
pub trait Convert: Sized {
    /// Writes the components in order.
    fn write_to<W: PrimitiveSink>(&self, sink: &mut W) -> StreamResult<()>;

    /// Reads the components in order.
    fn read_from<R: PrimitiveSource>(source: &mut R) -> StreamResult<Self>;
}

impl<P: Primitive> Convert for P {
    #[inline]
    fn write_to<W: PrimitiveSink>(&self, sink: &mut W) -> StreamResult<()> {
        sink.put(*self)
    }

    #[inline]
    fn read_from<R: PrimitiveSource>(source: &mut R) -> StreamResult<Self> {
        source.take()
    }
}

macro_rules! impl_convert_struct {
    ($ty:ident { $($field:ident: $fty:ty),+ }) => {
        impl Convert for $ty {
            fn write_to<W: PrimitiveSink>(&self, sink: &mut W) -> StreamResult<()> {
                $(self.$field.write_to(sink)?;)+
                Ok(())
            }

            fn read_from<R: PrimitiveSource>(source: &mut R) -> StreamResult<Self> {
                $(let $field = <$fty>::read_from(source)?;)+
                Ok(Self { $($field),+ })
            }
        }
    };
}

impl_convert_struct!(Vector2 { x: f32, y: f32 });
impl_convert_struct!(Vector3 { x: f32, y: f32, z: f32 });
impl_convert_struct!(Vector4 { x: f32, y: f32, z: f32, w: f32 });
impl_convert_struct!(Rotation { x: f32, y: f32, z: f32, w: f32 });
impl_convert_struct!(RigidTransform { pos: Vector3, rot: Rotation });
impl_convert_struct!(Transform { pos: Vector3, rot: Rotation, scale: f32 });
impl_convert_struct!(Plane { normal: Vector3, dist: f32 });

/// Output stream wrapper that sends every value through `C`.
pub struct OutConverter<'a, C: ByteOrder> {
    stream: &'a mut dyn OutStream,
    _order: PhantomData<C>,
}

impl<'a, C: ByteOrder> OutConverter<'a, C> {
    /// Wraps `stream`.
    pub fn new(stream: &'a mut dyn OutStream) -> Self {
        Self {
            stream,
            _order: PhantomData,
        }
    }

    /// Byte order being written.
    #[must_use]
    pub const fn endian(&self) -> Endian {
        C::ENDIAN
    }

    /// Writes any [`Convert`] value.
    pub fn write<T: Convert>(&mut self, value: &T) -> StreamResult<()> {
        value.write_to(self)
    }

    /// Writes bytes untouched.
    pub fn write_raw(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.stream.write(bytes)
    }

    /// Writes a `u16` length through the converter, then the raw bytes.
    pub fn write_string(&mut self, s: &str) -> StreamResult<()> {
        let len = u16::try_from(s.len()).map_err(|_| StreamError::StringTooLong(s.len()))?;
        self.put(len)?;
        self.stream.write(s.as_bytes())
    }

    /// Writes a `u16` unit count, then each UTF-16 unit through the converter.
    pub fn write_wstring(&mut self, s: &str) -> StreamResult<()> {
        let units: Vec<u16> = s.encode_utf16().collect();
        let len = u16::try_from(units.len()).map_err(|_| StreamError::StringTooLong(units.len()))?;
        self.put(len)?;
        units.iter().try_for_each(|&unit| self.put(unit))
    }

    /// Flushes the underlying stream.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.stream.flush()
    }
}

impl<C: ByteOrder> PrimitiveSink for OutConverter<'_, C> {
    #[inline]
    fn put<P: Primitive>(&mut self, value: P) -> StreamResult<()> {
        self.stream.write(C::convert(value).to_ne_bytes().as_ref())
    }
}

/// Input stream wrapper that sends every value through `C`.
pub struct InConverter<'a, C: ByteOrder> {
    stream: &'a mut dyn InStream,
    _order: PhantomData<C>,
}

impl<'a, C: ByteOrder> InConverter<'a, C> {
    /// Wraps `stream`.
    pub fn new(stream: &'a mut dyn InStream) -> Self {
        Self {
            stream,
            _order: PhantomData,
        }
    }

    /// Reads any [`Convert`] value.
    pub fn read<T: Convert>(&mut self) -> StreamResult<T> {
        T::read_from(self)
    }

    /// Fills `buf` untouched.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        self.stream.read(buf)
    }

    /// Bytes left in the stream.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.stream.len().saturating_sub(self.stream.pos())
    }

    /// Reads a string written by [`OutConverter::write_string`].
    pub fn read_string(&mut self) -> StreamResult<String> {
        let len: u16 = self.take()?;
        let mut bytes = vec![0u8; usize::from(len)];
        self.stream.read(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| StreamError::InvalidUtf8)
    }

    /// Reads a string written by [`OutConverter::write_wstring`].
    pub fn read_wstring(&mut self) -> StreamResult<String> {
        let len: u16 = self.take()?;
        let units = (0..len).map(|_| self.take::<u16>()).collect::<StreamResult<Vec<u16>>>()?;
        String::from_utf16(&units).map_err(|_| StreamError::InvalidUtf8)
    }
}

impl<C: ByteOrder> PrimitiveSource for InConverter<'_, C> {
    #[inline]
    fn take<P: Primitive>(&mut self) -> StreamResult<P> {
        let mut bytes = P::Bytes::default();
        self.stream.read(bytes.as_mut())?;
        Ok(C::convert(P::from_ne_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltsdk_platform::MemoryOutStream;

    fn involution<P: Primitive + PartialEq + std::fmt::Debug>(values: &[P]) {
        for &v in values {
            let twice = SwapConverter::convert(SwapConverter::convert(v));
            assert_eq!(twice.to_ne_bytes().as_ref(), v.to_ne_bytes().as_ref());
            assert_eq!(NullConverter::convert(v).to_ne_bytes().as_ref(), v.to_ne_bytes().as_ref());
        }
    }

    #[test]
    fn test_swap_is_involution_for_every_primitive() {
        involution(&[i8::MIN, -1, 0, 1, i8::MAX]);
        involution(&[i16::MIN, -2, 0x1234, i16::MAX]);
        involution(&[i32::MIN, -3, 0x1234_5678, i32::MAX]);
        involution(&[i64::MIN, -4, 0x0123_4567_89AB_CDEF, i64::MAX]);
        involution(&[0u8, 0x7F, u8::MAX]);
        involution(&[0u16, 0xABCD, u16::MAX]);
        involution(&[0u32, 0xDEAD_BEEF, u32::MAX]);
        involution(&[0u64, 0xFEED_FACE_CAFE_BEEF, u64::MAX]);
        involution(&[true, false]);
        involution(&[0.0f32, -0.0, 1.5, f32::MAX, f32::MIN_POSITIVE]);
        involution(&[0.0f64, -2.25, f64::MAX, f64::EPSILON]);
    }

    #[test]
    fn test_swap_reverses_file_bytes() {
        let mut native = MemoryOutStream::new();
        OutConverter::<NullConverter>::new(&mut native).write(&0x0102_0304u32).unwrap();
        let mut swapped = MemoryOutStream::new();
        OutConverter::<SwapConverter>::new(&mut swapped).write(&0x0102_0304u32).unwrap();

        let mut reversed = native.as_slice().to_vec();
        reversed.reverse();
        assert_eq!(swapped.as_slice(), reversed.as_slice());
    }

    #[test]
    fn test_composite_field_order() {
        let mut out = MemoryOutStream::new();
        let transform = Transform::new(Vector3::new(1.0, 2.0, 3.0), Rotation::new(4.0, 5.0, 6.0, 7.0), 8.0);
        OutConverter::<NullConverter>::new(&mut out).write(&transform).unwrap();
        OutConverter::<NullConverter>::new(&mut out)
            .write(&Plane::new(Vector3::new(9.0, 10.0, 11.0), 12.0))
            .unwrap();

        let floats: Vec<f32> = out
            .as_slice()
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, (1..=12).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_back_through_swap() {
        let mut out = MemoryOutStream::new();
        {
            let mut writer = OutConverter::<SwapConverter>::new(&mut out);
            writer.write(&RigidTransform::new(Vector3::new(1.0, -2.0, 0.5), Rotation::IDENTITY)).unwrap();
            writer.write_string("Ammo").unwrap();
            writer.write_wstring("Łódź").unwrap();
            writer.write(&-12345i64).unwrap();
        }

        let mut input = out.into_in_stream();
        let mut reader = InConverter::<SwapConverter>::new(&mut input);
        let rigid: RigidTransform = reader.read().unwrap();
        assert_eq!(rigid.pos, Vector3::new(1.0, -2.0, 0.5));
        assert_eq!(rigid.rot, Rotation::IDENTITY);
        assert_eq!(reader.read_string().unwrap(), "Ammo");
        assert_eq!(reader.read_wstring().unwrap(), "Łódź");
        assert_eq!(reader.read::<i64>().unwrap(), -12345);
        assert_eq!(reader.remaining(), 0);
    }
}
