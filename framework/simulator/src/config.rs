const PIXEL_DECAY: f64 = 0.75;
const DOM_DECAY: f64 = 0.6;
const VARIABLE_DECAY: f64 = 0.6;
const FAN_OUT_DECAY: f64 = 0.75;

/// One container in a generated configuration tree.
///
/// Built once by [build_container_config] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Number of pixel tags to simulate in this container.
    pub pixel_tags: u32,
    /// Number of DOM tags to simulate in this container.
    pub dom_tags: u32,
    /// Size of the variable resolution workload.
    pub variables: u32,
    /// Selector queries per DOM tag. The same at every depth.
    pub dom_complexity: u32,
    /// Distance from the root container, which is at depth 0.
    pub depth: u32,
    /// Child containers, loaded in order after this container's own tags.
    pub nested: Vec<ContainerConfig>,
}

impl ContainerConfig {
    /// The deepest `depth` found anywhere in this subtree.
    pub fn max_depth(&self) -> u32 {
        self.nested
            .iter()
            .map(ContainerConfig::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Number of containers in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .nested
            .iter()
            .map(ContainerConfig::node_count)
            .sum::<usize>()
    }
}

/// Flat scenario parameters that [build_container_config] expands into a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildParams {
    pub pixel_tags: u32,
    pub dom_tags: u32,
    pub variables: u32,
    /// Deepest level to generate. 0 gives a lone root container.
    pub nested_depth: u32,
    /// Children per container at the first level. Treated as at least 1.
    pub fan_out: u32,
    pub dom_complexity: u32,
}

/// The per-container workload carried down the tree while it is built.
#[derive(Debug, Clone, Copy)]
struct Workload {
    pixel_tags: u32,
    dom_tags: u32,
    variables: u32,
    dom_complexity: u32,
}

impl Workload {
    fn decayed(self) -> Self {
        Self {
            pixel_tags: decay(self.pixel_tags, PIXEL_DECAY),
            dom_tags: decay(self.dom_tags, DOM_DECAY),
            variables: decay(self.variables, VARIABLE_DECAY),
            dom_complexity: self.dom_complexity,
        }
    }

    fn into_container(self, depth: u32, nested: Vec<ContainerConfig>) -> ContainerConfig {
        ContainerConfig {
            pixel_tags: self.pixel_tags,
            dom_tags: self.dom_tags,
            variables: self.variables,
            dom_complexity: self.dom_complexity,
            depth,
            nested,
        }
    }
}

fn decay(value: u32, factor: f64) -> u32 {
    (value as f64 * factor).round() as u32
}

fn decay_fan_out(fan_out: u32) -> u32 {
    decay(fan_out, FAN_OUT_DECAY).max(1)
}

/// Expand scenario parameters into a configuration tree.
///
/// Every level below the root gets a decayed copy of its parent's workload: pixel tags by 0.75,
/// DOM tags and variables by 0.6, each rounded to the nearest integer. The number of siblings
/// shrinks by 0.75 per level but never drops below 1, so only `nested_depth` ends the recursion.
pub fn build_container_config(params: &BuildParams) -> ContainerConfig {
    let root = Workload {
        pixel_tags: params.pixel_tags,
        dom_tags: params.dom_tags,
        variables: params.variables,
        dom_complexity: params.dom_complexity,
    };

    let nested = build_level(root.decayed(), params.fan_out.max(1), 1, params.nested_depth);
    root.into_container(0, nested)
}

fn build_level(workload: Workload, fan_out: u32, depth: u32, max_depth: u32) -> Vec<ContainerConfig> {
    if depth > max_depth {
        return Vec::new();
    }

    let nested = build_level(
        workload.decayed(),
        decay_fan_out(fan_out),
        depth + 1,
        max_depth,
    );

    // Siblings are identical, build the subtree once and clone it.
    vec![workload.into_container(depth, nested); fan_out as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(nested_depth: u32, fan_out: u32) -> BuildParams {
        BuildParams {
            pixel_tags: 20,
            dom_tags: 10,
            variables: 50,
            nested_depth,
            fan_out,
            dom_complexity: 120,
        }
    }

    fn assert_decay(node: &ContainerConfig) {
        for child in &node.nested {
            assert_eq!(child.depth, node.depth + 1);
            assert_eq!(child.pixel_tags, (node.pixel_tags as f64 * 0.75).round() as u32);
            assert_eq!(child.dom_tags, (node.dom_tags as f64 * 0.6).round() as u32);
            assert_eq!(child.variables, (node.variables as f64 * 0.6).round() as u32);
            assert_eq!(child.dom_complexity, node.dom_complexity);
            assert_decay(child);
        }
    }

    #[test]
    fn zero_depth_is_a_lone_root() {
        let config = build_container_config(&params(0, 3));

        assert_eq!(config.depth, 0);
        assert!(config.nested.is_empty());
        assert_eq!(config.pixel_tags, 20);
        assert_eq!(config.max_depth(), 0);
    }

    #[test]
    fn single_level_of_decayed_children() {
        let config = build_container_config(&BuildParams {
            pixel_tags: 4,
            dom_tags: 0,
            variables: 0,
            nested_depth: 1,
            fan_out: 2,
            dom_complexity: 0,
        });

        assert_eq!(config.nested.len(), 2);
        for child in &config.nested {
            assert_eq!(child.pixel_tags, 3);
            assert_eq!(child.depth, 1);
            assert!(child.nested.is_empty());
        }
    }

    #[test]
    fn max_depth_matches_nested_depth() {
        for nested_depth in 0..5 {
            let config = build_container_config(&params(nested_depth, 2));
            assert_eq!(config.depth, 0);
            assert_eq!(config.max_depth(), nested_depth);
        }
    }

    #[test]
    fn children_decay_from_their_parent() {
        let config = build_container_config(&params(4, 3));
        assert_decay(&config);
    }

    #[test]
    fn small_workloads_settle_instead_of_vanishing() {
        let config = build_container_config(&BuildParams {
            pixel_tags: 1,
            dom_tags: 1,
            variables: 0,
            nested_depth: 3,
            fan_out: 1,
            dom_complexity: 5,
        });

        // round(0.75) and round(0.6) are both 1, a zero workload stays zero.
        let deepest = &config.nested[0].nested[0].nested[0];
        assert_eq!(deepest.depth, 3);
        assert_eq!(deepest.pixel_tags, 1);
        assert_eq!(deepest.dom_tags, 1);
        assert_eq!(deepest.variables, 0);
        assert_eq!(deepest.dom_complexity, 5);
    }

    #[test]
    fn fan_out_shrinks_per_level_with_a_floor_of_one() {
        let config = build_container_config(&params(4, 4));

        // 4 -> round(3.0) = 3 -> round(2.25) = 2 -> round(1.5) = 2
        assert_eq!(config.nested.len(), 4);
        assert_eq!(config.nested[0].nested.len(), 3);
        assert_eq!(config.nested[0].nested[0].nested.len(), 2);
        assert_eq!(config.nested[0].nested[0].nested[0].nested.len(), 2);
        assert!(config.nested[0].nested[0].nested[0].nested[0].nested.is_empty());
        assert_eq!(config.node_count(), 1 + 4 + 12 + 24 + 48);
    }

    #[test]
    fn zero_fan_out_still_generates_one_child_per_level() {
        let config = build_container_config(&params(3, 0));

        assert_eq!(config.node_count(), 4);
        assert_eq!(config.max_depth(), 3);
    }

    #[test]
    fn building_twice_gives_the_same_tree() {
        let first = build_container_config(&params(3, 3));
        let second = build_container_config(&params(3, 3));

        assert_eq!(first, second);
    }
}
