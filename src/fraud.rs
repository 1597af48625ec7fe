//! Advisory perceptual-hash screening. Flags visually similar re-uploads
//! in the logs so admins can review them; it never gates acceptance,
//! since template-generated cards hash near-identically for unrelated
//! legitimate submissions.

use anyhow::Result;
use image::imageops::FilterType;
use tracing::warn;

use crate::db::Db;

/// Hamming distance at or below which two hashes are flagged as similar.
pub const SIMILARITY_THRESHOLD: u32 = 6;

/// 64-bit difference hash: grayscale, shrink to 9x8, one bit per
/// left-to-right neighbor comparison, hex-encoded.
pub fn dhash(bytes: &[u8]) -> Result<String> {
  let luma = image::load_from_memory(bytes)?.to_luma8();
  let small = image::imageops::resize(&luma, 9, 8, FilterType::Triangle);
  let mut bits: u64 = 0;
  for y in 0 .. 8 {
    for x in 0 .. 8 {
      let left = small.get_pixel(x, y).0[0];
      let right = small.get_pixel(x + 1, y).0[0];
      bits = (bits << 1) | u64::from(left > right);
    }
  }
  Ok(format!("{bits:016x}"))
}

pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
  let a = u64::from_str_radix(a, 16).ok()?;
  let b = u64::from_str_radix(b, 16).ok()?;
  Some((a ^ b).count_ones())
}

/// Smallest distance between `candidate` and any stored hash.
pub fn nearest_distance<'a>(hashes: impl IntoIterator<Item = &'a String>, candidate: &str) -> Option<u32> {
  hashes
    .into_iter()
    .filter_map(|known| hamming_distance(known, candidate))
    .min()
}

/// Hashes an accepted photo, logs a warning when it lands near a stored
/// hash, and records it. Purely advisory; callers swallow errors.
pub async fn advisory_check(db: &Db, participant_id: i64, photo_bytes: &[u8]) -> Result<()> {
  let phash = dhash(photo_bytes)?;
  let known = db.photo_hashes().await?;
  if let Some(distance) = nearest_distance(&known, &phash)
    && distance <= SIMILARITY_THRESHOLD
  {
    warn!(participant_id, phash = %phash, distance, "visually similar photo detected");
  }
  db.add_photo_hash(participant_id, &phash).await?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use image::ImageOutputFormat;
  use image::Luma;

  use super::*;

  fn png_bytes(pixel: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    let img = image::GrayImage::from_fn(9, 8, |x, y| Luma([pixel(x, y)]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageLuma8(img)
      .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
      .expect("png encoding");
    buf
  }

  #[test]
  fn hamming_counts_differing_bits() {
    assert_eq!(hamming_distance("0000000000000000", "0000000000000000"), Some(0));
    assert_eq!(hamming_distance("0000000000000000", "ffffffffffffffff"), Some(64));
    assert_eq!(hamming_distance("0000000000000001", "0000000000000003"), Some(1));
    assert_eq!(hamming_distance("not-hex", "0000000000000000"), None);
  }

  #[test]
  fn nearest_distance_picks_minimum() {
    let known = vec!["ffffffffffffffff".to_string(), "0000000000000003".to_string()];
    assert_eq!(nearest_distance(&known, "0000000000000001"), Some(1));
    assert_eq!(nearest_distance(&Vec::new(), "0000000000000001"), None);
  }

  #[test]
  fn dhash_of_monotonic_gradient_is_all_zero_bits() {
    // Brightness strictly increases left to right, so no pixel is
    // brighter than its right neighbor.
    let bytes = png_bytes(|x, _| (x * 20) as u8);
    assert_eq!(dhash(&bytes).unwrap(), "0000000000000000");
  }

  #[test]
  fn dhash_of_reversed_gradient_is_all_one_bits() {
    let bytes = png_bytes(|x, _| 200 - (x * 20) as u8);
    assert_eq!(dhash(&bytes).unwrap(), "ffffffffffffffff");
  }

  #[test]
  fn dhash_rejects_non_image_bytes() {
    assert!(dhash(b"definitely not an image").is_err());
  }
}
