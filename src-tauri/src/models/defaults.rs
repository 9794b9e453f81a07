use crate::analysis::totals::recompute_scores;
use crate::models::scorecard::{Category, Competitor, Metric, Scorecard};

const DEFAULT_COMPETITORS: [&str; 6] = [
    "SiteOne.com",
    "Grainger",
    "Home Depot",
    "PlantingTree.com",
    "Fastenal",
    "Heritage",
];

fn metric(name: &str, description: &str, scores: [u8; 6]) -> Metric {
    Metric {
        name: name.to_string(),
        description: description.to_string(),
        scores: scores.iter().copied().map(Some).collect(),
    }
}

fn category(name: &str, metrics: Vec<Metric>) -> Category {
    Category {
        name: name.to_string(),
        metrics,
    }
}

/// The product-content analysis matrix shipped with the app, totals included.
pub fn default_scorecard() -> Scorecard {
    let competitors = DEFAULT_COMPETITORS
        .iter()
        .map(|name| Competitor {
            name: name.to_string(),
            score: 0,
        })
        .collect();

    let categories = vec![
        category(
            "Site Navigation",
            vec![
                metric(
                    "Taxonomy Menu: Mega Menu",
                    "Expandable navigation showing full product hierarchy and category breadth",
                    [4, 4, 4, 3, 3, 3],
                ),
                metric(
                    "Faceted Navigation",
                    "Filter system using product attributes for refinement",
                    [3, 4, 4, 4, 3, 4],
                ),
            ],
        ),
        category(
            "Product List Page",
            vec![
                metric(
                    "Product Descriptions",
                    "Structured naming with brand, model, and key specifications",
                    [3, 3, 4, 3, 2, 3],
                ),
                metric(
                    "Thumbnail Images",
                    "Quality and consistency of list view images",
                    [3, 3, 4, 4, 2, 3],
                ),
            ],
        ),
        category(
            "Product Detail Images",
            vec![
                metric(
                    "Primary Image",
                    "Presence and quality of main product image",
                    [4, 4, 4, 4, 3, 3],
                ),
                metric(
                    "Multiple Images",
                    "Additional product views/angles available",
                    [2, 3, 4, 4, 2, 2],
                ),
                metric(
                    "Rich Content",
                    "Interactive rotating product view",
                    [0, 0, 0, 0, 0, 0],
                ),
                metric(
                    "Lifestyle Images",
                    "Photos showing product being used/installed",
                    [0, 2, 4, 4, 0, 0],
                ),
            ],
        ),
        category(
            "Product Media",
            vec![
                metric(
                    "Product Videos",
                    "Video content showing product features/use",
                    [0, 0, 0, 0, 0, 0],
                ),
                metric(
                    "Product PDF Assets",
                    "Spec sheets, manuals, installation guides",
                    [3, 2, 4, 3, 2, 1],
                ),
            ],
        ),
        category(
            "Product Content",
            vec![
                metric(
                    "Long Description/Feature Bullets",
                    "Marketing descriptions and key product features",
                    [3, 2, 4, 4, 3, 2],
                ),
                metric(
                    "Specifications",
                    "Technical product attributes and details",
                    [3, 4, 4, 4, 3, 2],
                ),
                metric(
                    "How to?",
                    "Where/how to use the product",
                    [3, 2, 4, 4, 2, 1],
                ),
                metric(
                    "Product Recommendations/Substitutions",
                    "Compatible products, replacement parts",
                    [3, 3, 4, 3, 2, 2],
                ),
                metric(
                    "Customer Reviews & Q&A",
                    "Customer feedback and questions with answers",
                    [2, 3, 4, 3, 1, 0],
                ),
                metric(
                    "Projects/Inspirational/Collections",
                    "Project ideas and inspirational content",
                    [1, 2, 4, 3, 0, 0],
                ),
                metric(
                    "Base/Variant - SUPER SKU",
                    "Product variants and super SKU structure",
                    [2, 3, 4, 2, 2, 1],
                ),
            ],
        ),
    ];

    let mut scorecard = Scorecard {
        competitors,
        categories,
    };
    recompute_scores(&mut scorecard);
    scorecard
}
