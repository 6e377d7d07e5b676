// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use serde_json::Value;

/// Deep-merge two JSON values.
/// `base` is the lower-priority layer, `overlay` the higher-priority one.
/// Tables merge key by key; anything else in `overlay` replaces `base`.
pub(super) fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = if let Some(base_val) = base_map.remove(&key) {
                    deep_merge(base_val, overlay_val)
                } else {
                    overlay_val
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_base, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_nested_tables() {
        let base = json!({"image": {"tag": "a", "docker": "docker"}, "maintenance": {"x": 1}});
        let overlay = json!({"image": {"tag": "b"}});
        let merged = deep_merge(base, overlay);
        assert_eq!(
            merged,
            json!({"image": {"tag": "b", "docker": "docker"}, "maintenance": {"x": 1}})
        );
    }

    #[test]
    fn test_deep_merge_arrays_replace() {
        let base = json!({"packages": ["ffmpeg", "gpac"]});
        let overlay = json!({"packages": ["ffmpeg"]});
        assert_eq!(deep_merge(base, overlay), json!({"packages": ["ffmpeg"]}));
    }
}
