//! Secret and public keys.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use curve::{Affine, Projective, RandomField, ScalarField};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use crate::errors::MusigError;
use crate::serde_util::{BytesVisitor, FromStrVisitor};

/// A secret key: a nonzero scalar below the group order.
///
/// # Example
///
/// ```
/// use musig::SecretKey;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let sk = SecretKey::random(&mut rng);
/// let pk = sk.public_key();
/// assert_eq!(pk.serialize().len(), 33);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 32]", into = "[u8; 32]")]
pub struct SecretKey {
    scalar: ScalarField,
}

/// A public key: a point on the curve other than the point at infinity.
///
/// Keys are always valid once constructed, so operations accepting a
/// `PublicKey` never need to re-check it.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PublicKey {
    point: Affine,
}

impl SecretKey {
    /// Generates a uniformly random secret key.
    ///
    /// # Arguments
    ///
    /// * `rng` - A cryptographically secure random number generator
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SecretKey {
            scalar: ScalarField::random_nonzero(rng),
        }
    }

    /// Parses a 32-byte big-endian secret key.
    ///
    /// # Returns
    ///
    /// `MusigError::InvalidSecretKey` if the value is zero or not below the
    /// group order.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Result<Self, MusigError> {
        ScalarField::from_be_bytes_checked(bytes)
            .and_then(Self::from_scalar)
            .ok_or(MusigError::InvalidSecretKey)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, MusigError> {
        let array: &[u8; SECRET_KEY_SIZE] =
            bytes.try_into().map_err(|_| MusigError::InvalidSecretKey)?;
        Self::from_bytes(array)
    }

    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.scalar.to_be_bytes()
    }

    /// Derives the public key `sk * G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: Affine::mul_generator(&self.scalar),
        }
    }

    /// Returns `sk + tweak mod n`.
    ///
    /// This is the secret key of the output key produced by
    /// [`crate::Context::pubkey_tweak_add`] with the same tweak.
    ///
    /// # Returns
    ///
    /// * `MusigError::InvalidTweak` if the tweak is not below the group order
    /// * `MusigError::ZeroResult` if the sum is zero
    pub fn add_tweak(&self, tweak: &[u8; 32]) -> Result<Self, MusigError> {
        let tweak = ScalarField::from_be_bytes_checked(tweak).ok_or(MusigError::InvalidTweak)?;
        Self::from_scalar(self.scalar + tweak).ok_or(MusigError::ZeroResult)
    }

    #[inline]
    pub(crate) fn scalar(&self) -> &ScalarField {
        &self.scalar
    }

    pub(crate) fn from_scalar(scalar: ScalarField) -> Option<Self> {
        if scalar.is_zero() {
            None
        } else {
            Some(SecretKey { scalar })
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl TryFrom<[u8; SECRET_KEY_SIZE]> for SecretKey {
    type Error = MusigError;

    fn try_from(bytes: [u8; SECRET_KEY_SIZE]) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<SecretKey> for [u8; SECRET_KEY_SIZE] {
    fn from(sk: SecretKey) -> Self {
        sk.to_bytes()
    }
}

impl PublicKey {
    /// Parses a SEC1 compressed (33 bytes) or uncompressed (65 bytes) key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MusigError> {
        let point = Affine::from_sec1_bytes(bytes).map_err(|_| MusigError::InvalidPublicKey)?;
        Self::from_affine(point).ok_or(MusigError::InvalidPublicKey)
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.point.to_compressed()
    }

    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        self.point.to_uncompressed()
    }

    /// The 32-byte big-endian x coordinate.
    pub fn x_only(&self) -> [u8; 32] {
        self.point.x.to_be_bytes()
    }

    #[inline]
    pub fn as_affine(&self) -> &Affine {
        &self.point
    }

    pub(crate) fn from_affine(point: Affine) -> Option<Self> {
        if point.is_infinity() {
            None
        } else {
            Some(PublicKey { point })
        }
    }

    pub(crate) fn from_projective(point: &Projective) -> Option<Self> {
        Self::from_affine(point.to_affine())
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(sk: &SecretKey) -> Self {
        sk.public_key()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialize().hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.serialize()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = MusigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(self)
        } else {
            s.serialize_bytes(&self.serialize())
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            d.deserialize_str(FromStrVisitor::new("a hex-encoded SEC1 public key"))
        } else {
            d.deserialize_bytes(BytesVisitor::new(
                "a SEC1 public key",
                PublicKey::from_slice,
            ))
        }
    }
}
