//! Static category to suggestion mappings backing the auto-complete inputs.
//!
//! These are never fetched or persisted. Selecting a category repopulates
//! the suggestion list of the module's name input.

/// Category-keyed suggestion lists for one input.
#[derive(Debug)]
pub struct SuggestionCatalog {
    /// Form field the suggestions complete.
    pub input_field: &'static str,
    /// Form field holding the selected category.
    pub category_field: &'static str,
    pub entries: &'static [(&'static str, &'static [&'static str])],
}

impl SuggestionCatalog {
    /// Suggestions for `category`, in catalog order. Unknown categories
    /// (including the empty "not selected" value) yield nothing.
    pub fn lookup(&self, category: &str) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, items)| *items)
            .unwrap_or(&[])
    }

    /// Category names, in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

pub static ALLERGENS: SuggestionCatalog = SuggestionCatalog {
    input_field: "allergen",
    category_field: "category",
    entries: &[
        (
            "Food",
            &[
                "Peanuts", "Tree Nuts", "Milk", "Eggs", "Wheat", "Soy", "Fish", "Shellfish",
                "Sesame", "Gluten",
            ],
        ),
        (
            "Drug",
            &[
                "Penicillin",
                "Aspirin",
                "Ibuprofen",
                "Sulfa drugs",
                "Insulin",
                "Codeine",
                "Morphine",
                "Anesthetics",
                "Contrast dye",
                "Chemotherapy drugs",
            ],
        ),
        (
            "Environmental",
            &[
                "Dust mites",
                "Pollen",
                "Mold",
                "Pet dander",
                "Latex",
                "Insect stings",
                "Bee venom",
                "Grass",
                "Ragweed",
                "Cockroaches",
            ],
        ),
        (
            "Other",
            &[
                "Sun exposure",
                "Certain fabrics",
                "Nickel",
                "Cosmetics",
                "Fragrance",
                "Cleaning products",
                "Adhesives",
            ],
        ),
    ],
};

pub static SURGERIES: SuggestionCatalog = SuggestionCatalog {
    input_field: "surgery_name",
    category_field: "category",
    entries: &[
        (
            "Orthopedic",
            &[
                "Hip Replacement",
                "Knee Replacement",
                "Spinal Fusion",
                "ACL Reconstruction",
                "Rotator Cuff Repair",
                "Arthroscopy",
                "Fracture Fixation",
            ],
        ),
        (
            "Cardiac",
            &[
                "Bypass Surgery (CABG)",
                "Valve Replacement",
                "Angioplasty",
                "Pacemaker Implant",
                "Heart Transplant",
                "Stent Placement",
            ],
        ),
        (
            "Neurological",
            &[
                "Brain Tumor Removal",
                "Spinal Decompression",
                "Shunt Placement",
                "Craniotomy",
                "Deep Brain Stimulation",
            ],
        ),
        (
            "General",
            &[
                "Appendectomy",
                "Cholecystectomy",
                "Hernia Repair",
                "Mastectomy",
                "Thyroidectomy",
                "Hysterectomy",
            ],
        ),
        (
            "Other",
            &[
                "Cataract Surgery",
                "LASIK",
                "Cosmetic Surgery",
                "Organ Transplant",
                "Biopsy",
            ],
        ),
    ],
};

pub static IMPLANTS: SuggestionCatalog = SuggestionCatalog {
    input_field: "device_name",
    category_field: "category",
    entries: &[
        (
            "Pacemaker",
            &[
                "Single Chamber Pacemaker",
                "Dual Chamber Pacemaker",
                "Biventricular Pacemaker",
                "Leadless Pacemaker",
                "ICD (Defibrillator)",
            ],
        ),
        (
            "Stent",
            &[
                "Coronary Stent",
                "Drug-eluting Stent",
                "Bare-metal Stent",
                "Carotid Stent",
                "Peripheral Stent",
            ],
        ),
        (
            "Prosthetic",
            &[
                "Dental Implant",
                "Cochlear Implant",
                "Breast Implant",
                "Penile Implant",
                "Artificial Eye",
            ],
        ),
        (
            "Joint Replacement",
            &[
                "Hip Prosthesis",
                "Knee Prosthesis",
                "Shoulder Prosthesis",
                "Ankle Prosthesis",
                "Elbow Prosthesis",
            ],
        ),
        (
            "Other",
            &[
                "Spinal Cord Stimulator",
                "Insulin Pump",
                "Neurostimulator",
                "Port-a-Cath",
                "Bone Screws/Plates",
                "Mesh Implant",
            ],
        ),
    ],
};
