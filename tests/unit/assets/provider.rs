use std::io::Cursor;

use super::*;

fn wish(occasion: Occasion) -> WishSpec {
    WishSpec {
        occasion,
        recipient_name: "Kirthi".into(),
        sender_name: None,
        message: "hello".into(),
        date: "30/03/2007".into(),
        color_highlight: None,
        color_bg: None,
    }
}

struct Failing;

impl ImageProvider for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn provide(&self, _: &WishSpec, _: u32, _: u32) -> MagicWishResult<PreparedImage> {
        Err(MagicWishError::asset("offline"))
    }
}

#[test]
fn procedural_is_deterministic_and_opaque() {
    let a = ProceduralBackdrop.provide(&wish(Occasion::Birthday), 48, 32).unwrap();
    let b = ProceduralBackdrop.provide(&wish(Occasion::Birthday), 48, 32).unwrap();
    assert_eq!(a, b);
    assert_eq!((a.width, a.height), (48, 32));
    assert!(a.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn procedural_differs_per_occasion() {
    let all = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::NewYear,
        Occasion::Wedding,
        Occasion::Graduation,
        Occasion::Other,
    ];
    let images: Vec<_> = all
        .iter()
        .map(|&o| ProceduralBackdrop.provide(&wish(o), 40, 40).unwrap())
        .collect();
    for i in 0..images.len() {
        for j in (i + 1)..images.len() {
            assert_ne!(images[i].rgba8_premul, images[j].rgba8_premul);
        }
    }
}

#[test]
fn slot_fills_once() {
    let slot = BackdropSlot::empty();
    assert!(!slot.is_ready());
    let img = PreparedImage::from_premul(1, 1, vec![1, 2, 3, 255]).unwrap();
    assert!(slot.clone().fill(img.clone()));
    assert!(slot.is_ready());
    let other = PreparedImage::from_premul(1, 1, vec![9, 9, 9, 255]).unwrap();
    assert!(!slot.fill(other));
    assert_eq!(slot.get(), Some(&img));
}

#[test]
fn spawned_provider_fills_slot() {
    let (slot, handle) =
        spawn_backdrop(Arc::new(ProceduralBackdrop), wish(Occasion::Wedding), 16, 16).unwrap();
    handle.join().unwrap();
    assert!(slot.is_ready());
}

#[test]
fn failing_provider_leaves_slot_empty() {
    let (slot, handle) = spawn_backdrop(Arc::new(Failing), wish(Occasion::Other), 16, 16).unwrap();
    handle.join().unwrap();
    assert!(!slot.is_ready());
}

#[test]
fn file_backdrop_reads_and_fits() {
    let dir = std::env::temp_dir().join(format!("magicwish-file-backdrop-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bg.png");
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255])))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, buf).unwrap();

    let img = FileBackdrop::new(&path).provide(&wish(Occasion::Birthday), 8, 8).unwrap();
    assert_eq!((img.width, img.height), (8, 8));

    let missing = FileBackdrop::new(dir.join("missing.png")).provide(&wish(Occasion::Birthday), 8, 8);
    assert!(matches!(missing, Err(MagicWishError::Asset(_))));
    let _ = std::fs::remove_dir_all(&dir);
}
