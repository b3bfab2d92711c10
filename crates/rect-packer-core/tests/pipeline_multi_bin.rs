use rect_packer_core::error::RectPackerError;
use rect_packer_core::prelude::*;
use rect_packer_core::{bin_to_json, to_json};
use serde_json::json;

fn cfg(w: u32, h: u32, heuristic: Heuristic) -> PackerConfig {
    PackerConfig::builder()
        .with_bin_dimensions(w, h)
        .heuristic(heuristic)
        .build()
}

fn squares(count: usize, side: u32) -> Vec<Rectangle> {
    (0..count)
        .map(|i| {
            Rectangle::new(side, side)
                .unwrap()
                .with_label(format!("sq{i}"))
        })
        .collect()
}

#[test]
fn overflow_opens_new_bins() {
    let out = pack_rectangles(squares(5, 60), &cfg(100, 100, Heuristic::BottomLeft)).unwrap();

    assert_eq!(out.bins.len(), 5);
    assert!(out.bins.iter().all(|b| b.used().len() == 1));
    assert_eq!(out.heuristic, Heuristic::BottomLeft);
    // Every bin after the first was fed the previous bin's leftovers.
    assert_eq!(out.bins[0].cant_pack().len(), 4);
    assert_eq!(out.bins[3].cant_pack().len(), 1);
    assert!(out.bins[4].cant_pack().is_empty());
    assert_eq!(out.bins[4].used()[0].label(), Some("sq4"));

    let stats = out.stats();
    assert_eq!(stats.num_bins, 5);
    assert_eq!(stats.num_placed, 5);
    assert_eq!(stats.used_area, 5 * 3600);
    assert_eq!(stats.total_bin_area, 5 * 10_000);
    assert!((stats.occupancy - 0.36).abs() < 1e-9);
    assert_eq!(stats.wasted_area(), 32_000);
    assert!((stats.waste_percentage() - 64.0).abs() < 1e-9);
    assert_eq!(stats.bin_usage.len(), 5);
    assert!(stats.summary().contains("Bins: 5"));
}

#[test]
fn everything_fits_in_one_bin() {
    let out = pack_rectangles(squares(4, 50), &cfg(100, 100, Heuristic::BestShortSideFit)).unwrap();
    assert_eq!(out.bins.len(), 1);
    assert!((out.bins[0].usage() - 1.0).abs() < 1e-9);
    assert!(out.bins[0].free().is_empty());
}

#[test]
fn oversized_item_is_out_of_space() {
    let items = vec![
        Rectangle::new(50, 50).unwrap(),
        Rectangle::new(200, 10).unwrap(),
    ];
    match pack_rectangles(items, &cfg(100, 100, Heuristic::BestAreaFit)) {
        Err(RectPackerError::OutOfSpace { placed, total }) => {
            assert_eq!(placed, 1);
            assert_eq!(total, 2);
        }
        other => panic!("expected OutOfSpace, got {other:?}"),
    }
}

#[test]
fn empty_input_and_bad_config_are_errors() {
    assert!(matches!(
        pack_rectangles(Vec::new(), &PackerConfig::default()),
        Err(RectPackerError::Empty)
    ));
    assert!(matches!(
        pack_rectangles(squares(1, 5), &cfg(0, 100, Heuristic::BestAreaFit)),
        Err(RectPackerError::InvalidDimensions { .. })
    ));
}

#[test]
fn frame_and_tile_share_a_bin() {
    let items = vec![
        Rectangle::new(60, 60).unwrap().with_label("tile"),
        Rectangle::windowed(300, 300, Borders::uniform(100))
            .unwrap()
            .with_label("frame"),
    ];
    let out = pack_rectangles(items, &cfg(500, 500, Heuristic::BestAreaFit)).unwrap();

    assert_eq!(out.bins.len(), 1);
    let bin = &out.bins[0];
    assert_eq!(bin.used()[0].label(), Some("frame"));
    assert_eq!(bin.used()[1].rect(), Rect::new(115, 115, 60, 60));

    let stats = out.stats();
    assert_eq!(stats.num_windowed, 1);
    assert_eq!(stats.used_area, 90_000 - 4_900 + 3_600);
}

#[test]
fn auto_portfolio_never_worse_than_single_heuristic() {
    let mut items = Vec::new();
    for (w, h) in [(70, 30), (30, 70), (50, 50), (20, 80), (80, 20), (45, 45), (60, 35)] {
        for _ in 0..3 {
            items.push(Rectangle::new(w, h).unwrap());
        }
    }

    let single = pack_rectangles(items.clone(), &cfg(120, 120, Heuristic::BottomLeft)).unwrap();
    for mode in [AutoMode::Fast, AutoMode::Quality] {
        let auto_cfg = PackerConfig::builder()
            .with_bin_dimensions(120, 120)
            .auto_mode(Some(mode))
            .build();
        let best = pack_rectangles(items.clone(), &auto_cfg).unwrap();
        assert!(best.bins.len() <= single.bins.len(), "{mode:?}");
        assert_eq!(best.stats().num_placed, items.len());
    }
}

#[test]
fn auto_reports_chosen_heuristic() {
    let auto_cfg = PackerConfig::builder()
        .with_bin_dimensions(100, 100)
        .auto_mode(Some(AutoMode::Fast))
        .build();
    let out = pack_auto(squares(4, 50), &auto_cfg).unwrap();
    assert!(matches!(
        out.heuristic,
        Heuristic::BottomLeft | Heuristic::BestAreaFit
    ));
    assert_eq!(out.bins.len(), 1);
}

#[test]
fn export_describes_every_bin() {
    let mut items = squares(2, 60);
    items.push(
        Rectangle::windowed(80, 80, Borders::new(10, 5))
            .unwrap()
            .with_label("frame")
            .with_data(json!({"order": 12})),
    );
    let out = pack_rectangles(items, &cfg(100, 100, Heuristic::BestAreaFit)).unwrap();
    let v = to_json(&out);

    let bins = v["bins"].as_array().unwrap();
    assert_eq!(bins.len(), out.bins.len());
    assert_eq!(v["meta"]["app"], "rect-packer");
    assert_eq!(v["meta"]["heuristic"], "RectBestAreaFit");
    assert_eq!(v["meta"]["flipTrigger"], "wider_than_tall");

    let frame = bins
        .iter()
        .flat_map(|b| b["used"].as_array().unwrap().iter())
        .find(|u| u["label"] == "frame")
        .expect("frame exported");
    assert_eq!(frame["data"]["order"], 12);
    assert_eq!(frame["window"]["hollow"], true);
    assert_eq!(frame["window"]["borders"], json!({"bottom": 10, "left": 5, "top": 10, "right": 5}));
    assert_eq!(frame["window"]["frame"]["w"], 40);
    assert_eq!(frame["window"]["frame"]["h"], 30);
}

#[test]
fn bin_json_lists_free_space_and_leftovers() {
    let mut bin = Bin::new(100, 100, true).unwrap();
    bin.insert_many(
        vec![
            Rectangle::new(100, 40).unwrap(),
            Rectangle::new(100, 70).unwrap().with_flip(FlipPolicy::NoFlip),
        ],
        Heuristic::BestAreaFit,
    );

    let v = bin_to_json(3, &bin);
    assert_eq!(v["id"], 3);
    assert_eq!(v["used"].as_array().unwrap().len(), 1);
    assert_eq!(v["cantPack"].as_array().unwrap().len(), 1);
    assert_eq!(v["free"][0], json!({"x": 0, "y": 70, "w": 100, "h": 30}));
    assert!(v["used"][0].get("window").is_none());
}
