use crate::bin::Bin;
use crate::model::{Rect, Rectangle};
use crate::pipeline::PackOutput;
use serde_json::{Value, json};

fn rect_json(r: &Rect) -> Value {
    json!({"x": r.x, "y": r.y, "w": r.w, "h": r.h})
}

fn rectangle_json(r: &Rectangle) -> Value {
    let rect = r.rect();
    let mut v = json!({
        "x": rect.x,
        "y": rect.y,
        "w": rect.w,
        "h": rect.h,
        "rotated": r.is_rotated(),
        "label": r.label(),
        "data": r.data(),
    });
    if let Some(w) = r.as_windowed() {
        let b = w.borders();
        v["window"] = json!({
            "frame": rect_json(&w.window_rect()),
            "borders": {"bottom": b.bottom, "left": b.left, "top": b.top, "right": b.right},
            "hollow": w.is_hollow(),
        });
    }
    v
}

/// One bin as `{ id, width, height, usage, used, free, cantPack }`.
pub fn bin_to_json(id: usize, bin: &Bin) -> Value {
    json!({
        "id": id,
        "width": bin.width(),
        "height": bin.height(),
        "usage": bin.usage(),
        "used": bin.used().iter().map(rectangle_json).collect::<Vec<_>>(),
        "free": bin.free().iter().map(rect_json).collect::<Vec<_>>(),
        "cantPack": bin.cant_pack().iter().map(rectangle_json).collect::<Vec<_>>(),
    })
}

/// Serialize a whole packing run as `{ bins, meta }`.
pub fn to_json(out: &PackOutput) -> Value {
    let bins = out
        .bins
        .iter()
        .enumerate()
        .map(|(id, bin)| bin_to_json(id, bin))
        .collect::<Vec<_>>();
    json!({
        "bins": bins,
        "meta": {
            "app": "rect-packer",
            "version": env!("CARGO_PKG_VERSION"),
            "heuristic": out.heuristic.method_name(),
            "flipTrigger": out.flip_trigger,
        }
    })
}
