#![cfg(feature = "render")]

use rect_packer_core::prelude::*;
use rect_packer_core::{bin_to_svg, render_bin, wrap_label};

#[test]
fn wrap_label_breaks_on_words() {
    // 10px font, 6px per glyph: 60px holds 10 characters.
    assert_eq!(wrap_label("hello big world", 60, 10), vec!["hello big", "world"]);
    assert_eq!(wrap_label("short", 60, 10), vec!["short"]);
    assert_eq!(
        wrap_label("supercalifragilistic", 30, 10),
        vec!["supercalifragilistic"]
    );
    assert!(wrap_label("   ", 60, 10).is_empty());
}

#[test]
fn visualisation_options_use_camel_case_keys() {
    let opts: VisualisationOptions =
        serde_json::from_str(r#"{"fontSize": 20, "fontColour": "navy", "labelMargin": 2}"#)
            .unwrap();
    assert_eq!(opts.font_size, 20);
    assert_eq!(opts.font_colour, "navy");
    assert_eq!(opts.label_margin, 2);
    assert_eq!(opts.margin, 10);
    assert!(opts.font.is_none());
}

#[test]
fn svg_contains_used_free_and_labels() {
    let mut bin = Bin::new(500, 500, true).unwrap();
    let frame = Rectangle::windowed(300, 300, Borders::uniform(100))
        .unwrap()
        .with_label("window frame");
    bin.insert(&frame, Heuristic::BestAreaFit).unwrap();

    let svg = bin_to_svg(&bin, &VisualisationOptions::default()).to_string();

    assert!(svg.contains(r#"width="520""#));
    assert!(svg.contains("stroke-dasharray"));
    assert!(svg.contains(r#"stroke="blue""#));
    assert!(svg.contains("window frame"));
    // Background, outer frame, inner border and three free rectangles.
    assert_eq!(svg.matches("<rect").count(), 6);
    // The frame sits in the bottom-left corner, i.e. at the bottom of the image.
    assert!(svg.contains(r#"y="210""#));
}

#[test]
fn raster_has_margin_and_white_background() {
    let mut bin = Bin::new(100, 80, true).unwrap();
    bin.insert(&Rectangle::new(50, 50).unwrap(), Heuristic::BottomLeft)
        .unwrap();

    let img = render_bin(&bin, &VisualisationOptions::default()).unwrap();
    assert_eq!(img.dimensions(), (120, 100));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    // Inside the placed rectangle (white fill).
    assert_eq!(img.get_pixel(35, 65).0, [255, 255, 255, 255]);
    // Inside free space, tinted grey.
    let free_px = img.get_pixel(95, 25).0;
    assert!(free_px[0] < 255);
    assert_eq!(free_px[3], 255);
}
